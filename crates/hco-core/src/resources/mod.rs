use crate::{GroupVersionKind, ResourceKey};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use serde::{Deserialize, Serialize};

/// Base validation for all resources
pub fn validate_base(metadata: &ObjectMeta) -> Result<(), ResourceError> {
    match &metadata.name {
        None => Err(ResourceError::MissingField("metadata.name".to_string())),
        Some(name) if !is_valid_name(name) => Err(ResourceError::InvalidName(name.clone())),
        Some(_) => Ok(()),
    }
}

/// Trait for Kubernetes resources handled by the operator
pub trait Resource: Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Get the API version of this resource
    fn api_version(&self) -> String;

    /// Get the kind of this resource
    fn kind(&self) -> String;

    /// Get the metadata of this resource
    fn metadata(&self) -> &ObjectMeta;

    /// Get mutable metadata
    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    /// Plural resource name registered for this type
    fn plural(&self) -> &'static str;

    fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::from_type_meta(&self.api_version(), &self.kind(), self.plural())
    }

    /// Get the ResourceKey
    fn resource_key(&self) -> Result<ResourceKey, ResourceError> {
        let metadata = self.metadata();
        let name = metadata
            .name
            .as_ref()
            .ok_or_else(|| ResourceError::MissingField("metadata.name".to_string()))?;
        let namespace = metadata.namespace.clone().unwrap_or_default();

        Ok(ResourceKey::new(self.gvk(), namespace, name))
    }

    /// Get the UID
    fn uid(&self) -> Option<String> {
        self.metadata().uid.clone()
    }

    /// An unset or empty namespace means cluster-scoped
    fn is_namespaced(&self) -> bool {
        self.metadata()
            .namespace
            .as_deref()
            .is_some_and(|ns| !ns.is_empty())
    }

    /// Build an owner reference pointing at this resource
    fn owner_reference(&self) -> Result<OwnerReference, ResourceError> {
        let metadata = self.metadata();
        Ok(OwnerReference {
            api_version: self.api_version(),
            kind: self.kind(),
            name: metadata
                .name
                .clone()
                .ok_or_else(|| ResourceError::MissingField("metadata.name".to_string()))?,
            uid: metadata
                .uid
                .clone()
                .ok_or_else(|| ResourceError::MissingField("metadata.uid".to_string()))?,
            controller: Some(true),
            block_owner_deletion: Some(true),
        })
    }

    /// Validate the resource
    fn validate(&self) -> Result<(), ResourceError> {
        validate_base(self.metadata())
    }
}

/// Resource-related errors
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid resource name: {0}")]
    InvalidName(String),
}

/// Validate a Kubernetes resource name (DNS-1123 subdomain)
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }

    let bytes = name.as_bytes();
    let alnum = |c: &u8| c.is_ascii_lowercase() || c.is_ascii_digit();

    if !alnum(&bytes[0]) || !alnum(&bytes[bytes.len() - 1]) {
        return false;
    }

    bytes.iter().all(|c| alnum(c) || *c == b'-' || *c == b'.')
}
