//! Generic fetch-or-create driver shared by all operands.

use crate::cache::DesiredCache;
use crate::error::{OperandError, Result};
use crate::request::HcoRequest;
use crate::traits::{OperandHooks, ResourceClient};
use hco_core::{Resource, ResourceKey};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};

/// Outcome of one `ensure` pass over an operand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsureResult {
    pub component: String,
    pub name: String,
    pub created: bool,
    pub updated: bool,
    pub overwritten: bool,
    pub upgrade_done: bool,
}

impl EnsureResult {
    fn new(component: &str, name: &str) -> Self {
        Self {
            component: component.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Drives an `OperandHooks` implementation through a reconcile pass
pub struct GenericOperand<H: OperandHooks> {
    hooks: H,
    cr_type: String,
    /// Strip owner references from the live object. Older releases made the
    /// namespaced HyperConverged own cluster-scoped operands, which is not
    /// allowed.
    remove_existing_owner: bool,
    cache: DesiredCache<H::Cr>,
}

impl<H: OperandHooks> GenericOperand<H> {
    pub fn new(hooks: H, cr_type: impl Into<String>) -> Self {
        Self {
            hooks,
            cr_type: cr_type.into(),
            remove_existing_owner: false,
            cache: DesiredCache::new(),
        }
    }

    pub fn with_remove_existing_owner(mut self, remove: bool) -> Self {
        self.remove_existing_owner = remove;
        self
    }

    pub fn removes_existing_owner(&self) -> bool {
        self.remove_existing_owner
    }

    pub fn cr_type(&self) -> &str {
        &self.cr_type
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Desired object computed by the most recent pass
    pub fn cached_desired(&self) -> Option<&H::Cr> {
        self.cache.get()
    }

    /// Run one reconcile pass for this operand
    pub async fn ensure(
        &mut self,
        req: &mut HcoRequest,
        client: &dyn ResourceClient,
    ) -> Result<EnsureResult> {
        let span = req.span.clone();
        self.ensure_inner(req, client).instrument(span).await
    }

    async fn ensure_inner(
        &mut self,
        req: &mut HcoRequest,
        client: &dyn ResourceClient,
    ) -> Result<EnsureResult> {
        self.hooks.reset(&mut self.cache);
        let required = self
            .hooks
            .get_full_cr(&mut self.cache, &req.instance)?
            .clone();
        let key = required.resource_key()?;
        let mut res = EnsureResult::new(&self.cr_type, &key.name);

        let found = cancellable(&req.token, format!("get {}", key), client.get(&key)).await?;
        let Some(found) = found else {
            self.create(req, client, &key, required).await?;
            res.created = true;
            return Ok(res);
        };

        let mut found = decode_as(&self.hooks.get_empty_cr(), found)?;
        self.hooks.post_found(req, &found)?;

        let has_owners = self
            .hooks
            .get_object_meta(&found)
            .owner_references
            .as_ref()
            .is_some_and(|owners| !owners.is_empty());
        if self.remove_existing_owner && has_owners {
            info!("Removing existing owner references from {} {}", self.cr_type, key);
            found.metadata_mut().owner_references = None;
            update_resource(&req.token, client, &mut found).await?;
            res.updated = true;
            return Ok(res);
        }

        let outcome = self
            .hooks
            .update_cr(req, client, &mut found, &required)
            .await?;
        if outcome.updated {
            res.updated = true;
            res.overwritten = outcome.overwritten;
            return Ok(res);
        }

        let is_ready = req
            .conditions
            .handle_component_conditions(&self.cr_type, self.hooks.get_conditions(&found));
        res.upgrade_done =
            req.upgrade_mode && is_ready && self.hooks.check_component_version(&found);
        debug!(
            "{} {} unchanged (ready: {}, upgrade done: {})",
            self.cr_type, key, is_ready, res.upgrade_done
        );

        Ok(res)
    }

    async fn create(
        &self,
        req: &HcoRequest,
        client: &dyn ResourceClient,
        key: &ResourceKey,
        mut required: H::Cr,
    ) -> Result<()> {
        if !self.remove_existing_owner && required.is_namespaced() {
            let owner = req.instance.owner_reference()?;
            required.metadata_mut().owner_references = Some(vec![owner]);
        }

        info!("Creating {} {}", self.cr_type, key);
        let body = hco_core::to_value(&required)?;
        cancellable(&req.token, format!("create {}", key), client.create(key, &body)).await?;
        Ok(())
    }
}

/// Decode an API object into the type of `empty`, rejecting other kinds
pub fn decode_as<K: Resource>(empty: &K, value: serde_json::Value) -> Result<K> {
    let expected = format!("{}/{}", empty.api_version(), empty.kind());
    let api_version = value.get("apiVersion").and_then(|v| v.as_str());
    let kind = value.get("kind").and_then(|v| v.as_str());

    match (api_version, kind) {
        (Some(api_version), Some(kind))
            if api_version == empty.api_version() && kind == empty.kind() => {}
        _ => {
            return Err(OperandError::type_mismatch(
                expected,
                format!(
                    "{}/{}",
                    api_version.unwrap_or("<none>"),
                    kind.unwrap_or("<none>")
                ),
            ))
        }
    }

    Ok(hco_core::from_value(value)?)
}

/// Send `obj` to the API server in a single update call, replacing it with
/// the stored version on success. Nothing is sent once `token` is cancelled.
pub async fn update_resource<K: Resource>(
    token: &CancellationToken,
    client: &dyn ResourceClient,
    obj: &mut K,
) -> Result<()> {
    let key = obj.resource_key()?;
    let body = hco_core::to_value(&*obj)?;
    let stored = cancellable(token, format!("update {}", key), client.update(&key, &body)).await?;
    *obj = hco_core::from_value(stored)?;
    Ok(())
}

async fn cancellable<T>(
    token: &CancellationToken,
    operation: String,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(OperandError::cancelled(operation)),
        res = fut => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use crate::network_addons::new_network_addons_handler;
    use crate::OperandConfig;
    use hco_core::crd::conditions::{
        CONDITION_AVAILABLE, CONDITION_DEGRADED, CONDITION_PROGRESSING, STATUS_FALSE, STATUS_TRUE,
    };
    use hco_core::crd::NetworkAddonsConfigStatus;
    use hco_core::k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
    use hco_core::{Condition, HyperConverged, NetworkAddonsConfig};

    fn make_hc() -> HyperConverged {
        let mut hc = HyperConverged::default();
        hc.metadata.name = Some("kubevirt-hyperconverged".to_string());
        hc.metadata.namespace = Some("kubevirt-hyperconverged".to_string());
        hc.metadata.uid = Some("hc-uid".to_string());
        hc
    }

    fn config() -> OperandConfig {
        OperandConfig::new("1.12.0", "v0.91.0")
    }

    fn request(hc: HyperConverged) -> HcoRequest {
        HcoRequest::new(hc, CancellationToken::new())
    }

    #[tokio::test]
    async fn test_creates_missing_operand_without_owner() {
        let client = MockClient::new();
        let mut operand = new_network_addons_handler(config());
        let mut req = request(make_hc());

        let res = operand.ensure(&mut req, &client).await.unwrap();
        assert!(res.created);
        assert!(!res.updated);
        assert_eq!(res.component, "NetworkAddonsConfig");
        assert_eq!(res.name, "cluster");

        let stored: NetworkAddonsConfig = client.get_object("", "cluster").await.unwrap();
        assert!(stored.metadata.owner_references.is_none());
        assert!(stored.metadata.namespace.is_none());
        assert_eq!(client.create_count(), 1);
    }

    #[tokio::test]
    async fn test_second_pass_is_noop() {
        let client = MockClient::new();
        let mut operand = new_network_addons_handler(config());

        let mut req = request(make_hc());
        operand.ensure(&mut req, &client).await.unwrap();

        let mut req = request(make_hc());
        let res = operand.ensure(&mut req, &client).await.unwrap();
        assert!(!res.created);
        assert!(!res.updated);
        assert_eq!(client.update_count(), 0);
        // No status yet: the HyperConverged is told the operand is new
        assert!(req.conditions.get(CONDITION_AVAILABLE).unwrap().is_false());
    }

    #[tokio::test]
    async fn test_removes_existing_owner_references() {
        let client = MockClient::new();
        let mut operand = new_network_addons_handler(config());
        assert!(operand.removes_existing_owner());

        let mut req = request(make_hc());
        operand.ensure(&mut req, &client).await.unwrap();

        let mut stored: NetworkAddonsConfig = client.get_object("", "cluster").await.unwrap();
        stored.metadata.owner_references = Some(vec![OwnerReference {
            api_version: "hco.kubevirt.io/v1beta1".to_string(),
            kind: "HyperConverged".to_string(),
            name: "kubevirt-hyperconverged".to_string(),
            uid: "hc-uid".to_string(),
            ..Default::default()
        }]);
        client.put_object(&stored).await;

        let mut req = request(make_hc());
        let res = operand.ensure(&mut req, &client).await.unwrap();
        assert!(res.updated);
        assert!(!res.overwritten);

        let stored: NetworkAddonsConfig = client.get_object("", "cluster").await.unwrap();
        assert!(stored.metadata.owner_references.is_none());
        assert_eq!(client.update_count(), 1);
    }

    #[tokio::test]
    async fn test_owner_removal_keeps_unmodeled_fields() {
        let client = MockClient::new();
        let mut operand = new_network_addons_handler(config());
        let key = ResourceKey::cluster_scoped(NetworkAddonsConfig::default().gvk(), "cluster");

        client
            .create(
                &key,
                &serde_json::json!({
                    "apiVersion": "networkaddonsoperator.network.kubevirt.io/v1",
                    "kind": "NetworkAddonsConfig",
                    "metadata": {
                        "name": "cluster",
                        "ownerReferences": [{
                            "apiVersion": "hco.kubevirt.io/v1beta1",
                            "kind": "HyperConverged",
                            "name": "kubevirt-hyperconverged",
                            "uid": "hc-uid"
                        }]
                    },
                    "spec": { "multus": {}, "kubeSecondaryDNS": { "domain": "vm" } },
                    "status": { "observedVersion": "v0.90.0", "containers": [{ "name": "multus" }] }
                }),
            )
            .await
            .unwrap();

        let mut req = request(make_hc());
        let res = operand.ensure(&mut req, &client).await.unwrap();
        assert!(res.updated);

        let stored = client.get(&key).await.unwrap().unwrap();
        assert!(stored.pointer("/metadata/ownerReferences").is_none());
        assert_eq!(stored["spec"]["kubeSecondaryDNS"]["domain"], "vm");
        assert_eq!(stored["status"]["containers"][0]["name"], "multus");
    }

    #[tokio::test]
    async fn test_persisting_instance_keeps_unmodeled_fields() {
        let client = MockClient::new();
        let hc_key = make_hc().resource_key().unwrap();
        let mut live = hco_core::to_value(&make_hc()).unwrap();
        live["spec"]["featureGates"] = serde_json::json!({ "deployKubeSecondaryDNS": true });
        live["spec"]["certConfig"] = serde_json::json!({ "ca": { "duration": "48h0m0s" } });
        client.create(&hc_key, &live).await.unwrap();

        let hc = decode_as(&HyperConverged::default(), client.get(&hc_key).await.unwrap().unwrap())
            .unwrap();
        let mut req = request(hc).with_upgrade_mode(true);
        seed_live_ovs(&client).await;
        let mut operand = new_network_addons_handler(config());
        operand.ensure(&mut req, &client).await.unwrap();
        assert!(req.dirty);

        update_resource(&req.token, &client, &mut req.instance).await.unwrap();

        let stored = client.get(&hc_key).await.unwrap().unwrap();
        assert_eq!(stored["metadata"]["annotations"]["deployOVS"], "true");
        assert_eq!(stored["spec"]["featureGates"]["deployKubeSecondaryDNS"], true);
        assert_eq!(stored["spec"]["certConfig"]["ca"]["duration"], "48h0m0s");
        assert_eq!(req.instance.spec.extra.len(), 2);
    }

    /// Seed a live NetworkAddonsConfig that deploys OVS
    async fn seed_live_ovs(client: &MockClient) {
        let mut cna = crate::new_network_addons(&make_hc(), &config(), None).unwrap();
        cna.spec.ovs = Some(hco_core::crd::Ovs {});
        client.put_object(&cna).await;
    }

    #[tokio::test]
    async fn test_upgrade_done_requires_ready_and_version() {
        let client = MockClient::new();
        let mut operand = new_network_addons_handler(config());

        let mut req = request(make_hc());
        operand.ensure(&mut req, &client).await.unwrap();

        let mut stored: NetworkAddonsConfig = client.get_object("", "cluster").await.unwrap();
        stored.status = Some(NetworkAddonsConfigStatus {
            conditions: vec![
                Condition::new(CONDITION_AVAILABLE, STATUS_TRUE, "Ok", ""),
                Condition::new(CONDITION_PROGRESSING, STATUS_FALSE, "Ok", ""),
                Condition::new(CONDITION_DEGRADED, STATUS_FALSE, "Ok", ""),
            ],
            observed_version: Some("v0.91.0".to_string()),
            ..Default::default()
        });
        client.put_object(&stored).await;

        let mut req = request(make_hc()).with_upgrade_mode(true);
        req.instance
            .metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert("deployOVS".to_string(), "false".to_string());
        let res = operand.ensure(&mut req, &client).await.unwrap();
        assert!(!res.updated);
        assert!(res.upgrade_done);
        assert!(req.conditions.is_empty());

        let mut req = request(make_hc());
        let res = operand.ensure(&mut req, &client).await.unwrap();
        assert!(!res.upgrade_done);
    }

    #[tokio::test]
    async fn test_cache_rebuilt_every_pass() {
        let client = MockClient::new();
        let mut operand = new_network_addons_handler(config());

        let mut req = request(make_hc());
        operand.ensure(&mut req, &client).await.unwrap();
        assert!(operand.cached_desired().unwrap().spec.ovs.is_none());

        let mut hc = make_hc();
        hc.metadata.annotations = Some([("deployOVS".to_string(), "true".to_string())].into());
        let mut req = request(hc);
        let res = operand.ensure(&mut req, &client).await.unwrap();
        assert!(res.updated);
        assert!(operand.cached_desired().unwrap().spec.ovs.is_some());

        let stored: NetworkAddonsConfig = client.get_object("", "cluster").await.unwrap();
        assert!(stored.spec.ovs.is_some());
    }

    #[tokio::test]
    async fn test_cancelled_request_sends_nothing() {
        let client = MockClient::new();
        let mut operand = new_network_addons_handler(config());
        let mut req = request(make_hc());
        req.token.cancel();

        let err = operand.ensure(&mut req, &client).await.unwrap_err();
        assert!(matches!(err, OperandError::Cancelled { .. }));
        assert_eq!(client.create_count(), 0);
    }

    #[test]
    fn test_decode_as_rejects_other_kinds() {
        let value = serde_json::json!({
            "apiVersion": "hco.kubevirt.io/v1beta1",
            "kind": "HyperConverged",
            "metadata": { "name": "cluster" }
        });
        let err = decode_as(&NetworkAddonsConfig::default(), value).unwrap_err();
        assert!(matches!(err, OperandError::TypeMismatch { .. }));

        let err = decode_as(&NetworkAddonsConfig::default(), serde_json::json!({})).unwrap_err();
        assert!(matches!(err, OperandError::TypeMismatch { .. }));

        let value = serde_json::json!({
            "apiVersion": "networkaddonsoperator.network.kubevirt.io/v1",
            "kind": "NetworkAddonsConfig",
            "metadata": { "name": "cluster" }
        });
        let cna = decode_as(&NetworkAddonsConfig::default(), value).unwrap();
        assert_eq!(cna.metadata.name.as_deref(), Some("cluster"));
    }
}
