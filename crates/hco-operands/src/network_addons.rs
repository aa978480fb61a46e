//! NetworkAddonsConfig operand.
//!
//! The NetworkAddonsConfig is cluster-scoped and reconciled by the
//! cluster-network-addons operator. This module derives its desired state
//! from the HyperConverged and keeps the live object's spec and labels
//! converged.

use crate::cache::DesiredCache;
use crate::config::OperandConfig;
use crate::error::Result;
use crate::labels::{operand_labels, APP_COMPONENT_NETWORK};
use crate::operand::{update_resource, GenericOperand};
use crate::patch::{apply_patch_to_spec, JSON_PATCH_CNAO_ANNOTATION};
use crate::placement::hco_placement_to_cnao;
use crate::request::HcoRequest;
use crate::traits::{OperandHooks, ResourceClient, UpdateOutcome};
use async_trait::async_trait;
use hco_core::crd::{
    KubeMacPool, LinuxBridge, Multus, NetworkAddonsConfigSpec, NmState, Ovs,
    PlacementConfiguration, OPERATOR_CONFIG,
};
use hco_core::{Condition, HyperConverged, NetworkAddonsConfig, ObjectMeta};
use std::collections::BTreeMap;
use tracing::info;

/// HyperConverged annotation toggling Open vSwitch deployment
pub const DEPLOY_OVS_ANNOTATION: &str = "deployOVS";

pub const CR_TYPE: &str = "NetworkAddonsConfig";

/// Build the operand handler for the NetworkAddonsConfig
pub fn new_network_addons_handler(config: OperandConfig) -> GenericOperand<NetworkAddonsHooks> {
    GenericOperand::new(NetworkAddonsHooks::new(config), CR_TYPE).with_remove_existing_owner(true)
}

pub struct NetworkAddonsHooks {
    config: OperandConfig,
}

impl NetworkAddonsHooks {
    pub fn new(config: OperandConfig) -> Self {
        Self { config }
    }

    /// Before the `deployOVS` annotation existed, OVS was deployed whenever
    /// the NetworkAddonsConfig asked for it. On upgrade, record the live
    /// choice on the HyperConverged so it survives; never touch an existing
    /// annotation.
    pub fn set_deploy_ovs_annotation(req: &mut HcoRequest, found: &NetworkAddonsConfig) {
        if !req.upgrade_mode || req.instance.annotation(DEPLOY_OVS_ANNOTATION).is_some() {
            return;
        }

        let value = if found.spec.ovs.is_some() { "true" } else { "false" };
        req.set_instance_annotation(DEPLOY_OVS_ANNOTATION, value);
        info!("deployOVS annotation is set to {}.", value);
    }

    /// Overwrite the live spec with the desired one. Spec drift is left alone
    /// during upgrades. Live fields the desired spec does not mention are
    /// kept as they are.
    pub fn update_spec(
        req: &HcoRequest,
        found: &mut NetworkAddonsConfig,
        required: &NetworkAddonsConfig,
    ) -> bool {
        if req.upgrade_mode {
            return false;
        }

        let mut desired = required.spec.clone();
        for (key, value) in &found.spec.extra {
            desired
                .extra
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        if found.spec == desired {
            return false;
        }

        if req.hco_triggered {
            info!("Updating existing Network Addons's Spec to new opinionated values");
        } else {
            info!("Reconciling an externally updated Network Addons's Spec to its opinionated values");
        }
        found.spec = desired;
        true
    }

    pub fn update_labels(found: &mut NetworkAddonsConfig, required: &NetworkAddonsConfig) -> bool {
        if found.metadata.labels == required.metadata.labels {
            return false;
        }

        found.metadata.labels = required.metadata.labels.clone();
        true
    }
}

#[async_trait]
impl OperandHooks for NetworkAddonsHooks {
    type Cr = NetworkAddonsConfig;

    fn get_full_cr<'c>(
        &self,
        cache: &'c mut DesiredCache<NetworkAddonsConfig>,
        hc: &HyperConverged,
    ) -> Result<&'c NetworkAddonsConfig> {
        cache.get_or_try_build(|| new_network_addons(hc, &self.config, None))
    }

    fn get_conditions<'a>(&self, cr: &'a NetworkAddonsConfig) -> &'a [Condition] {
        cr.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    fn check_component_version(&self, cr: &NetworkAddonsConfig) -> bool {
        let observed = cr.status.as_ref().and_then(|s| s.observed_version.as_deref());
        !self.config.network_addons_version.is_empty()
            && observed == Some(self.config.network_addons_version.as_str())
    }

    async fn update_cr(
        &self,
        req: &mut HcoRequest,
        client: &dyn ResourceClient,
        found: &mut NetworkAddonsConfig,
        required: &NetworkAddonsConfig,
    ) -> Result<UpdateOutcome> {
        Self::set_deploy_ovs_annotation(req, found);

        let mut changed = Self::update_spec(req, found, required);
        changed = Self::update_labels(found, required) || changed;

        if !changed {
            return Ok(UpdateOutcome::unchanged());
        }

        update_resource(&req.token, client, found).await?;
        Ok(UpdateOutcome::updated(req.hco_triggered))
    }
}

/// Compute the desired NetworkAddonsConfig for `hc`
pub fn new_network_addons(
    hc: &HyperConverged,
    config: &OperandConfig,
    namespace: Option<&str>,
) -> Result<NetworkAddonsConfig> {
    let infra = hco_placement_to_cnao(hc.spec.infra.node_placement.as_ref());
    let workloads = hco_placement_to_cnao(hc.spec.workloads.node_placement.as_ref());
    let placement_configuration = (infra.is_some() || workloads.is_some())
        .then_some(PlacementConfiguration { infra, workloads });

    let spec = NetworkAddonsConfigSpec {
        multus: Some(Multus {}),
        linux_bridge: Some(LinuxBridge {}),
        nm_state: Some(NmState {}),
        kube_mac_pool: Some(KubeMacPool::default()),
        ovs: ovs_from_annotations(hc.metadata.annotations.as_ref()),
        image_pull_policy: None,
        placement_configuration,
        extra: BTreeMap::new(),
    };

    let mut cna = new_network_addons_with_name_only(hc, config, namespace);
    cna.spec = spec;

    apply_patch_to_spec(hc, JSON_PATCH_CNAO_ANNOTATION, &mut cna)?;

    Ok(cna)
}

pub fn new_network_addons_with_name_only(
    hc: &HyperConverged,
    config: &OperandConfig,
    namespace: Option<&str>,
) -> NetworkAddonsConfig {
    NetworkAddonsConfig {
        metadata: ObjectMeta {
            name: Some(OPERATOR_CONFIG.to_string()),
            namespace: namespace.map(str::to_string),
            labels: Some(operand_labels(
                hc.name(),
                APP_COMPONENT_NETWORK,
                &config.hco_version,
            )),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// OVS is deployed only when explicitly requested with `deployOVS: "true"`
pub fn ovs_from_annotations(annotations: Option<&BTreeMap<String, String>>) -> Option<Ovs> {
    match annotations.and_then(|a| a.get(DEPLOY_OVS_ANNOTATION)) {
        Some(value) if value == "true" => Some(Ovs {}),
        _ => None,
    }
}
