//! HCO Core - Fundamental types for the HyperConverged operator
//!
//! This crate provides:
//! - The HyperConverged and NetworkAddonsConfig resource types
//! - Error types with miette diagnostics
//! - Type-safe resource keys and identifiers
//! - Serialization helpers

pub mod crd;
pub mod error;
pub mod resources;
pub mod types;

// Re-export commonly used types
pub use crd::{Condition, HyperConverged, NetworkAddonsConfig};
pub use error::{HcoError, Result};
pub use resources::{is_valid_name, Resource, ResourceError};
pub use types::{GroupVersionKind, ResourceKey};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Serialize a resource to JSON
pub fn to_json<T: serde::Serialize>(resource: &T) -> Result<String> {
    serde_json::to_string(resource).map_err(|e| {
        HcoError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a resource to a JSON value
pub fn to_value<T: serde::Serialize>(resource: &T) -> Result<serde_json::Value> {
    serde_json::to_value(resource).map_err(|e| {
        HcoError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a resource from a JSON value
pub fn from_value<T: for<'de> serde::Deserialize<'de>>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        HcoError::serialization_error(
            format!("Failed to deserialize from JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a resource from JSON
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| {
        HcoError::serialization_error(
            format!("Failed to deserialize from JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a resource to YAML
pub fn to_yaml<T: serde::Serialize>(resource: &T) -> Result<String> {
    serde_yaml::to_string(resource).map_err(|e| {
        HcoError::serialization_error(
            format!("Failed to serialize to YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a resource from YAML
pub fn from_yaml<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_yaml::from_str(data).map_err(|e| {
        HcoError::serialization_error(
            format!("Failed to deserialize from YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_serialization() {
        let mut hc = HyperConverged::default();
        hc.metadata.name = Some("kubevirt-hyperconverged".to_string());

        let json = to_json(&hc).unwrap();
        assert!(json.contains("kubevirt-hyperconverged"));

        let deserialized: HyperConverged = from_json(&json).unwrap();
        assert_eq!(deserialized, hc);
    }

    #[test]
    fn test_yaml_serialization() {
        let mut cna = NetworkAddonsConfig::default();
        cna.metadata.name = Some("cluster".to_string());

        let yaml = to_yaml(&cna).unwrap();
        assert!(yaml.contains("kind: NetworkAddonsConfig"));

        let deserialized: NetworkAddonsConfig = from_yaml(&yaml).unwrap();
        assert_eq!(deserialized.metadata.name, Some("cluster".to_string()));
    }

    #[test]
    fn test_from_value_reports_serialization_error() {
        let err = from_value::<HyperConverged>(serde_json::json!({ "spec": 5 })).unwrap_err();
        assert!(matches!(err, HcoError::SerializationError { .. }));
    }
}
