/// Versions the operator expects its operands to report
#[derive(Debug, Clone, Default)]
pub struct OperandConfig {
    /// Version of the operator itself, stamped into operand labels
    pub hco_version: String,
    /// Expected `status.observedVersion` of the NetworkAddonsConfig
    pub network_addons_version: String,
}

impl OperandConfig {
    pub fn new(hco_version: impl Into<String>, network_addons_version: impl Into<String>) -> Self {
        Self {
            hco_version: hco_version.into(),
            network_addons_version: network_addons_version.into(),
        }
    }
}
