//! NetworkAddonsConfig: the cluster-scoped resource reconciled by the
//! cluster-network-addons operator.

use super::conditions::Condition;
use crate::resources::Resource;
use k8s_openapi::api::core::v1::{Affinity, Toleration};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known name of the singleton NetworkAddonsConfig
pub const OPERATOR_CONFIG: &str = "cluster";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAddonsConfig {
    #[serde(default = "NetworkAddonsConfig::default_api_version")]
    pub api_version: String,
    #[serde(default = "NetworkAddonsConfig::default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: NetworkAddonsConfigSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NetworkAddonsConfigStatus>,
    /// Top-level fields this type does not model, kept so writes round-trip
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NetworkAddonsConfig {
    pub const GROUP: &'static str = "networkaddonsoperator.network.kubevirt.io";
    pub const VERSION: &'static str = "v1";
    pub const KIND: &'static str = "NetworkAddonsConfig";
    pub const PLURAL: &'static str = "networkaddonsconfigs";

    fn default_api_version() -> String {
        format!("{}/{}", Self::GROUP, Self::VERSION)
    }

    fn default_kind() -> String {
        Self::KIND.to_string()
    }
}

impl Default for NetworkAddonsConfig {
    fn default() -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ObjectMeta::default(),
            spec: NetworkAddonsConfigSpec::default(),
            status: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Resource for NetworkAddonsConfig {
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

/// Which network components are deployed, and where
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAddonsConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multus: Option<Multus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_bridge: Option<LinuxBridge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_mac_pool: Option<KubeMacPool>,
    #[serde(rename = "nmstate", default, skip_serializing_if = "Option::is_none")]
    pub nm_state: Option<NmState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ovs: Option<Ovs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_configuration: Option<PlacementConfiguration>,

    /// Spec fields this type does not model (selfSignConfiguration, macvtap,
    /// kubeSecondaryDNS, ...). Kept so an update never drops them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multus {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinuxBridge {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NmState {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ovs {}

/// MAC address pool; an empty range lets the component pick its own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeMacPool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra: Option<Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workloads: Option<Placement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAddonsConfigStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_version: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
