// Allow unused assignments for diagnostic fields - they're used by the thiserror/miette macros
#![allow(unused_assignments)]

pub mod api_client;
pub mod cache;
pub mod conditions;
pub mod config;
pub mod error;
pub mod labels;
pub mod mock;
pub mod network_addons;
pub mod operand;
pub mod patch;
pub mod placement;
pub mod request;
pub mod traits;

pub use error::{OperandError, Result};
pub use traits::{OperandHooks, ResourceClient, UpdateOutcome};

pub use api_client::ApiClient;
pub use cache::DesiredCache;
pub use conditions::HcoConditions;
pub use config::OperandConfig;
pub use mock::MockClient;
pub use network_addons::{new_network_addons, new_network_addons_handler, NetworkAddonsHooks};
pub use operand::{EnsureResult, GenericOperand};
pub use request::HcoRequest;
