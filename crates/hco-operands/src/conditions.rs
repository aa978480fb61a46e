//! Folding operand conditions into the HyperConverged condition set.

use chrono::Utc;
use hco_core::crd::conditions::{
    CONDITION_AVAILABLE, CONDITION_DEGRADED, CONDITION_PROGRESSING, CONDITION_UPGRADEABLE,
    STATUS_FALSE, STATUS_TRUE,
};
use hco_core::k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use hco_core::Condition;
use std::collections::BTreeMap;
use tracing::debug;

/// Conditions collected for the HyperConverged during one reconcile pass,
/// keyed by condition type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HcoConditions(BTreeMap<String, Condition>);

impl HcoConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a condition, stamping the transition time when the status changes
    pub fn set_status_condition(&mut self, mut condition: Condition) {
        let changed = self
            .0
            .get(&condition.type_)
            .map(|existing| existing.status != condition.status)
            .unwrap_or(true);

        if changed {
            condition.last_transition_time = Some(Time(Utc::now()));
        } else if let Some(existing) = self.0.get(&condition.type_) {
            condition.last_transition_time = existing.last_transition_time.clone();
        }
        self.0.insert(condition.type_.clone(), condition);
    }

    pub fn get(&self, type_: &str) -> Option<&Condition> {
        self.0.get(type_)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<Condition> {
        self.0.into_values().collect()
    }

    /// Merge the conditions reported by an operand. Returns whether the
    /// operand looks ready.
    pub fn handle_component_conditions(&mut self, component: &str, conditions: &[Condition]) -> bool {
        if conditions.is_empty() {
            self.conditions_for_new_cr(component);
            return false;
        }

        let mut is_ready = true;
        let mut found_available = false;
        let mut found_progressing = false;
        let mut found_degraded = false;

        for condition in conditions {
            match condition.type_.as_str() {
                CONDITION_AVAILABLE => {
                    found_available = true;
                    if condition.is_false() {
                        is_ready = false;
                        self.component_not_available(component, condition.message.as_deref());
                    }
                }
                CONDITION_PROGRESSING => {
                    found_progressing = true;
                    if condition.is_true() {
                        is_ready = false;
                        self.component_progressing(component, condition);
                    }
                }
                CONDITION_DEGRADED => {
                    found_degraded = true;
                    if condition.is_true() {
                        is_ready = false;
                        self.set_status_condition(Condition::new(
                            CONDITION_DEGRADED,
                            STATUS_TRUE,
                            format!("{}Degraded", component),
                            format!(
                                "{} is degraded: {}",
                                component,
                                condition.message.as_deref().unwrap_or_default()
                            ),
                        ));
                    }
                }
                other => debug!("Ignoring {} condition {}", component, other),
            }
        }

        if !found_available {
            self.component_not_available(component, Some(r#"missing "Available" condition"#));
        }

        is_ready && found_available && found_progressing && found_degraded
    }

    fn conditions_for_new_cr(&mut self, component: &str) {
        let reason = format!("{}Conditions", component);
        let message = format!("{} resource has no conditions", component);
        self.set_status_condition(Condition::new(
            CONDITION_AVAILABLE,
            STATUS_FALSE,
            &reason,
            &message,
        ));
        self.set_status_condition(Condition::new(
            CONDITION_PROGRESSING,
            STATUS_TRUE,
            &reason,
            &message,
        ));
        self.set_status_condition(Condition::new(
            CONDITION_UPGRADEABLE,
            STATUS_FALSE,
            &reason,
            &message,
        ));
    }

    fn component_not_available(&mut self, component: &str, message: Option<&str>) {
        self.set_status_condition(Condition::new(
            CONDITION_AVAILABLE,
            STATUS_FALSE,
            format!("{}NotAvailable", component),
            format!("{} is not available: {}", component, message.unwrap_or_default()),
        ));
    }

    fn component_progressing(&mut self, component: &str, condition: &Condition) {
        let reason = format!("{}Progressing", component);
        let message = format!(
            "{} is progressing: {}",
            component,
            condition.message.as_deref().unwrap_or_default()
        );
        self.set_status_condition(Condition::new(
            CONDITION_PROGRESSING,
            STATUS_TRUE,
            &reason,
            &message,
        ));
        self.set_status_condition(Condition::new(
            CONDITION_UPGRADEABLE,
            STATUS_FALSE,
            &reason,
            &message,
        ));
    }
}
