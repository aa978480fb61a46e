use crate::conditions::HcoConditions;
use hco_core::HyperConverged;
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Span};

/// State carried through a single reconcile pass of the HyperConverged
#[derive(Debug)]
pub struct HcoRequest {
    /// The HyperConverged being reconciled. Operands may edit its
    /// annotations; the caller persists it when `dirty` is set.
    pub instance: HyperConverged,
    /// The operator is moving between versions
    pub upgrade_mode: bool,
    /// The pass was triggered by a change to the HyperConverged itself
    /// rather than by drift in a secondary resource
    pub hco_triggered: bool,
    /// `instance` was modified and must be written back
    pub dirty: bool,
    /// Conditions aggregated from operands during this pass
    pub conditions: HcoConditions,
    /// Cancels in-flight API calls made on behalf of this request
    pub token: CancellationToken,
    /// Span carrying the instance name and namespace
    pub span: Span,
}

impl HcoRequest {
    pub fn new(instance: HyperConverged, token: CancellationToken) -> Self {
        let span = info_span!(
            "reconcile",
            hyperconverged = %instance.name(),
            namespace = %instance.metadata.namespace.as_deref().unwrap_or_default(),
        );
        Self {
            instance,
            upgrade_mode: false,
            hco_triggered: true,
            dirty: false,
            conditions: HcoConditions::new(),
            token,
            span,
        }
    }

    pub fn with_upgrade_mode(mut self, upgrade_mode: bool) -> Self {
        self.upgrade_mode = upgrade_mode;
        self
    }

    pub fn with_hco_triggered(mut self, hco_triggered: bool) -> Self {
        self.hco_triggered = hco_triggered;
        self
    }

    /// Set an annotation on the instance and mark it for persistence
    pub fn set_instance_annotation(&mut self, key: &str, value: &str) {
        self.instance
            .metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert(key.to_string(), value.to_string());
        self.dirty = true;
    }
}
