use std::collections::BTreeMap;

pub const APP_LABEL: &str = "app";
pub const APP_LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const APP_LABEL_VERSION: &str = "app.kubernetes.io/version";
pub const APP_LABEL_PART_OF: &str = "app.kubernetes.io/part-of";
pub const APP_LABEL_COMPONENT: &str = "app.kubernetes.io/component";

pub const OPERATOR_NAME: &str = "hco-operator";
pub const HYPERCONVERGED_CLUSTER: &str = "hyperconverged-cluster";

pub const APP_COMPONENT_NETWORK: &str = "network";

/// Labels stamped on every object the operator manages
pub fn operand_labels(hc_name: &str, component: &str, hco_version: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (APP_LABEL.to_string(), hc_name.to_string()),
        (APP_LABEL_MANAGED_BY.to_string(), OPERATOR_NAME.to_string()),
        (APP_LABEL_VERSION.to_string(), hco_version.to_string()),
        (APP_LABEL_PART_OF.to_string(), HYPERCONVERGED_CLUSTER.to_string()),
        (APP_LABEL_COMPONENT.to_string(), component.to_string()),
    ])
}
