pub mod conditions;
pub mod hyperconverged;
pub mod network_addons;

pub use conditions::Condition;
pub use hyperconverged::{
    HyperConverged, HyperConvergedConfig, HyperConvergedSpec, HyperConvergedStatus, NodePlacement,
};
pub use network_addons::{
    KubeMacPool, LinuxBridge, Multus, NetworkAddonsConfig, NetworkAddonsConfigSpec,
    NetworkAddonsConfigStatus, NmState, Ovs, Placement, PlacementConfiguration, OPERATOR_CONFIG,
};
