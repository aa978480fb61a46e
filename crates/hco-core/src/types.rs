use serde::{Deserialize, Serialize};
use std::fmt;

/// Group, version and kind of an API type, plus the plural resource name
/// used in its REST paths
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    /// API group, empty for the core group
    pub group: String,
    pub version: String,
    pub kind: String,
    /// Lowercase plural as registered by the CRD (e.g. "hyperconvergeds")
    pub plural: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural: plural.into(),
        }
    }

    /// Split an apiVersion of the form "version" or "group/version"
    pub fn from_type_meta(api_version: &str, kind: &str, plural: &str) -> Self {
        let (group, version) = api_version.split_once('/').unwrap_or(("", api_version));
        Self::new(group, version, kind, plural)
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Path prefix for the group version, without a leading slash
    pub fn api_path(&self) -> String {
        if self.group.is_empty() {
            format!("api/{}", self.version)
        } else {
            format!("apis/{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version(), self.kind)
    }
}

/// Address of one object: its type, namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub gvk: GroupVersionKind,
    /// Empty for cluster-scoped objects
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(gvk: GroupVersionKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            gvk,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn cluster_scoped(gvk: GroupVersionKind, name: impl Into<String>) -> Self {
        Self::new(gvk, "", name)
    }

    pub fn is_namespaced(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// REST path of the object itself
    pub fn api_path(&self) -> String {
        format!("{}/{}", self.collection_path(), self.name)
    }

    /// REST path of the collection the object lives in
    pub fn collection_path(&self) -> String {
        let base = self.gvk.api_path();
        let resource = &self.gvk.plural;

        if self.is_namespaced() {
            format!("/{}/namespaces/{}/{}", base, self.namespace, resource)
        } else {
            format!("/{}/{}", base, resource)
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_namespaced() {
            write!(f, "{}/{}/{}", self.gvk, self.namespace, self.name)
        } else {
            write!(f, "{}/{}", self.gvk, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hc_gvk() -> GroupVersionKind {
        GroupVersionKind::new("hco.kubevirt.io", "v1beta1", "HyperConverged", "hyperconvergeds")
    }

    fn cna_gvk() -> GroupVersionKind {
        GroupVersionKind::from_type_meta(
            "networkaddonsoperator.network.kubevirt.io/v1",
            "NetworkAddonsConfig",
            "networkaddonsconfigs",
        )
    }

    #[test]
    fn test_gvk_from_type_meta() {
        let gvk = GroupVersionKind::from_type_meta("v1", "ConfigMap", "configmaps");
        assert_eq!(gvk.group, "");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.api_version(), "v1");
        assert_eq!(gvk.api_path(), "api/v1");

        let gvk = cna_gvk();
        assert_eq!(gvk.group, "networkaddonsoperator.network.kubevirt.io");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.api_version(), "networkaddonsoperator.network.kubevirt.io/v1");
        assert_eq!(gvk.to_string(), "networkaddonsoperator.network.kubevirt.io/v1/NetworkAddonsConfig");
    }

    #[test]
    fn test_namespaced_paths() {
        let key = ResourceKey::new(hc_gvk(), "kubevirt-hyperconverged", "kubevirt-hyperconverged");
        assert!(key.is_namespaced());
        assert_eq!(
            key.collection_path(),
            "/apis/hco.kubevirt.io/v1beta1/namespaces/kubevirt-hyperconverged/hyperconvergeds"
        );
        assert_eq!(
            key.api_path(),
            "/apis/hco.kubevirt.io/v1beta1/namespaces/kubevirt-hyperconverged/hyperconvergeds/kubevirt-hyperconverged"
        );
    }

    #[test]
    fn test_cluster_scoped_paths() {
        let key = ResourceKey::cluster_scoped(cna_gvk(), "cluster");
        assert!(!key.is_namespaced());
        assert_eq!(
            key.api_path(),
            "/apis/networkaddonsoperator.network.kubevirt.io/v1/networkaddonsconfigs/cluster"
        );
        assert_eq!(
            key.to_string(),
            "networkaddonsoperator.network.kubevirt.io/v1/NetworkAddonsConfig/cluster"
        );
    }
}
