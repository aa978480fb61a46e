//! HyperConverged: the top-level resource owned by the operator.

use super::conditions::Condition;
use crate::resources::Resource;
use k8s_openapi::api::core::v1::{Affinity, Toleration};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HyperConverged declares the desired state of the whole virtualization stack.
///
/// Example:
/// ```yaml
/// apiVersion: hco.kubevirt.io/v1beta1
/// kind: HyperConverged
/// metadata:
///   name: kubevirt-hyperconverged
///   namespace: kubevirt-hyperconverged
///   annotations:
///     deployOVS: "true"
/// spec:
///   infra:
///     nodePlacement:
///       nodeSelector:
///         node-role.kubernetes.io/infra: ""
///   workloads: {}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperConverged {
    #[serde(default = "HyperConverged::default_api_version")]
    pub api_version: String,
    #[serde(default = "HyperConverged::default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: HyperConvergedSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HyperConvergedStatus>,
    /// Top-level fields this type does not model, kept so writes round-trip
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl HyperConverged {
    pub const GROUP: &'static str = "hco.kubevirt.io";
    pub const VERSION: &'static str = "v1beta1";
    pub const KIND: &'static str = "HyperConverged";
    pub const PLURAL: &'static str = "hyperconvergeds";

    fn default_api_version() -> String {
        format!("{}/{}", Self::GROUP, Self::VERSION)
    }

    fn default_kind() -> String {
        Self::KIND.to_string()
    }

    /// Look up a single annotation value
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(key))
            .map(String::as_str)
    }

    /// Name of the instance, empty when unset
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }
}

impl Default for HyperConverged {
    fn default() -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ObjectMeta::default(),
            spec: HyperConvergedSpec::default(),
            status: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Resource for HyperConverged {
    fn api_version(&self) -> String {
        Self::default_api_version()
    }

    fn kind(&self) -> String {
        Self::default_kind()
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }

    fn plural(&self) -> &'static str {
        Self::PLURAL
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperConvergedSpec {
    /// Placement of infrastructure components (controllers, webhooks)
    #[serde(default)]
    pub infra: HyperConvergedConfig,

    /// Placement of workload-facing components (node agents, handlers)
    #[serde(default)]
    pub workloads: HyperConvergedConfig,

    /// Everything else in the spec (feature gates, workload update
    /// strategy, ...). Preserved untouched when the instance is written back.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperConvergedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_placement: Option<NodePlacement>,
}

/// Scheduling preferences for a group of components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperConvergedStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
