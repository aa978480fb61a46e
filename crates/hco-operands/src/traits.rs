use crate::cache::DesiredCache;
use crate::error::Result;
use crate::request::HcoRequest;
use async_trait::async_trait;
use hco_core::{Condition, HyperConverged, ObjectMeta, Resource, ResourceKey};

/// Access to the API object store
///
/// Objects travel as JSON so the same client serves every operand type.
/// Implemented over HTTP by `ApiClient` and in memory by `MockClient`.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch an object, `None` if it does not exist
    async fn get(&self, key: &ResourceKey) -> Result<Option<serde_json::Value>>;

    /// Create an object, returning what the server stored
    async fn create(&self, key: &ResourceKey, object: &serde_json::Value)
        -> Result<serde_json::Value>;

    /// Replace an object, returning what the server stored
    async fn update(&self, key: &ResourceKey, object: &serde_json::Value)
        -> Result<serde_json::Value>;
}

/// Outcome of reconciling an existing operand object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The live object was written back
    pub updated: bool,
    /// The write undid a change made by someone other than the operator
    pub overwritten: bool,
}

impl UpdateOutcome {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn updated(hco_triggered: bool) -> Self {
        Self {
            updated: true,
            overwritten: !hco_triggered,
        }
    }
}

/// Per-resource-type behavior plugged into `GenericOperand`
///
/// One implementation exists per operand custom resource. The engine owns
/// the desired-object cache and passes it in, resetting it at pass start.
#[async_trait]
pub trait OperandHooks: Send + Sync {
    /// The operand's resource type
    type Cr: Resource + Clone + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    /// Return the desired object for this pass, building it if needed
    fn get_full_cr<'c>(
        &self,
        cache: &'c mut DesiredCache<Self::Cr>,
        hc: &HyperConverged,
    ) -> Result<&'c Self::Cr>;

    /// Zero value used to decode API responses
    fn get_empty_cr(&self) -> Self::Cr {
        Self::Cr::default()
    }

    /// Called after the live object has been fetched
    fn post_found(&self, _req: &mut HcoRequest, _found: &Self::Cr) -> Result<()> {
        Ok(())
    }

    /// Status conditions reported by the live object
    fn get_conditions<'a>(&self, cr: &'a Self::Cr) -> &'a [Condition];

    /// Whether the live object reports the expected version
    fn check_component_version(&self, cr: &Self::Cr) -> bool;

    fn get_object_meta<'a>(&self, cr: &'a Self::Cr) -> &'a ObjectMeta {
        cr.metadata()
    }

    /// Drop the desired object computed for the previous pass
    fn reset(&self, cache: &mut DesiredCache<Self::Cr>) {
        cache.reset();
    }

    /// Converge `found` towards `required`, writing it back if needed
    async fn update_cr(
        &self,
        req: &mut HcoRequest,
        client: &dyn ResourceClient,
        found: &mut Self::Cr,
        required: &Self::Cr,
    ) -> Result<UpdateOutcome>;
}
