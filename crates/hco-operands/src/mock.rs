use crate::error::{OperandError, Result};
use crate::traits::ResourceClient;
use async_trait::async_trait;
use hco_core::{GroupVersionKind, Resource, ResourceKey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory object store for tests
///
/// Assigns a uid on create and a fresh resourceVersion on every write.
/// Updates can be made to fail to exercise error propagation.
#[derive(Default)]
pub struct MockClient {
    objects: Arc<RwLock<HashMap<ResourceKey, serde_json::Value>>>,
    creates: AtomicUsize,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent update call fail
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Store an object directly, bypassing the counters
    pub async fn put_object<K: Resource>(&self, obj: &K) {
        let Ok(key) = obj.resource_key() else {
            return;
        };
        if let Ok(value) = hco_core::to_value(obj) {
            self.objects.write().await.insert(key, value);
        }
    }

    /// Read back a stored object of type `K`
    pub async fn get_object<K: Resource + Default>(&self, namespace: &str, name: &str) -> Option<K> {
        let gvk: GroupVersionKind = K::default().gvk();
        let key = ResourceKey::new(gvk, namespace, name);
        let value = self.objects.read().await.get(&key).cloned()?;
        hco_core::from_value(value).ok()
    }

    fn stamp(object: &serde_json::Value, uid: Option<&serde_json::Value>) -> serde_json::Value {
        let mut object = object.clone();
        if let Some(metadata) = object
            .as_object_mut()
            .map(|o| o.entry("metadata").or_insert_with(|| serde_json::json!({})))
            .and_then(|m| m.as_object_mut())
        {
            let uid = uid
                .cloned()
                .unwrap_or_else(|| serde_json::Value::String(uuid::Uuid::new_v4().to_string()));
            metadata.insert("uid".to_string(), uid);
            metadata.insert(
                "resourceVersion".to_string(),
                serde_json::Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }
        object
    }
}

#[async_trait]
impl ResourceClient for MockClient {
    async fn get(&self, key: &ResourceKey) -> Result<Option<serde_json::Value>> {
        Ok(self.objects.read().await.get(key).cloned())
    }

    async fn create(
        &self,
        key: &ResourceKey,
        object: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(key) {
            return Err(OperandError::api_request_failed(
                "POST",
                key.collection_path(),
                "409 Conflict: already exists",
            ));
        }

        let stored = Self::stamp(object, None);
        objects.insert(key.clone(), stored.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);
        debug!("Mock: created {}", key);
        Ok(stored)
    }

    async fn update(
        &self,
        key: &ResourceKey,
        object: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(OperandError::api_request_failed(
                "PUT",
                key.api_path(),
                "500 Internal Server Error",
            ));
        }

        let mut objects = self.objects.write().await;
        let existing = objects.get(key).ok_or_else(|| {
            OperandError::api_request_failed("PUT", key.api_path(), "404 Not Found")
        })?;

        let uid = existing.pointer("/metadata/uid").cloned();
        let stored = Self::stamp(object, uid.as_ref());
        objects.insert(key.clone(), stored.clone());
        self.updates.fetch_add(1, Ordering::SeqCst);
        debug!("Mock: updated {}", key);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hco_core::NetworkAddonsConfig;

    fn cna_key() -> ResourceKey {
        ResourceKey::cluster_scoped(NetworkAddonsConfig::default().gvk(), "cluster")
    }

    #[tokio::test]
    async fn test_create_assigns_uid_and_conflicts() {
        let client = MockClient::new();
        let body = serde_json::json!({ "kind": "NetworkAddonsConfig", "metadata": { "name": "cluster" } });

        let stored = client.create(&cna_key(), &body).await.unwrap();
        assert!(stored.pointer("/metadata/uid").is_some());
        assert!(client.create(&cna_key(), &body).await.is_err());
        assert_eq!(client.create_count(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_uid_and_can_fail() {
        let client = MockClient::new();
        let body = serde_json::json!({ "metadata": { "name": "cluster" } });

        assert!(client.update(&cna_key(), &body).await.is_err());

        let created = client.create(&cna_key(), &body).await.unwrap();
        let updated = client.update(&cna_key(), &body).await.unwrap();
        assert_eq!(
            created.pointer("/metadata/uid"),
            updated.pointer("/metadata/uid")
        );
        assert_ne!(
            created.pointer("/metadata/resourceVersion"),
            updated.pointer("/metadata/resourceVersion")
        );

        client.fail_updates(true);
        let err = client.update(&cna_key(), &body).await.unwrap_err();
        assert!(matches!(err, OperandError::ApiRequestFailed { .. }));
        assert_eq!(client.update_count(), 1);
    }
}
