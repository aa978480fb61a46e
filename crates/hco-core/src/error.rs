// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for HyperConverged operations
#[derive(Error, Debug, Diagnostic)]
pub enum HcoError {
    /// Resource not found
    #[error("Resource not found: {resource_key}")]
    #[diagnostic(
        code(hco::resource_not_found),
        help("Verify the resource name, namespace, and API version are correct")
    )]
    ResourceNotFound {
        #[allow(unused)]
        resource_key: String,
    },

    /// Invalid resource
    #[error("Invalid resource: {reason}")]
    #[diagnostic(code(hco::invalid_resource), help("{suggestion}"))]
    InvalidResource {
        #[allow(unused)]
        reason: String,
        #[allow(unused)]
        suggestion: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(hco::serialization_error),
        help("Ensure the resource format is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    #[diagnostic(
        code(hco::internal_error),
        help("This is likely a bug. Please report it with the full error details")
    )]
    InternalError {
        #[allow(unused)]
        message: String,
    },
}

/// Result type alias for HyperConverged operations
pub type Result<T> = std::result::Result<T, HcoError>;

impl HcoError {
    /// Create a ResourceNotFound error
    pub fn resource_not_found(resource_key: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_key: resource_key.into(),
        }
    }

    /// Create an InvalidResource error
    pub fn invalid_resource(reason: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidResource {
            reason: reason.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }

    /// Create an InternalError
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<crate::resources::ResourceError> for HcoError {
    fn from(err: crate::resources::ResourceError) -> Self {
        Self::invalid_resource(err.to_string(), "Set metadata.name on the resource")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceError;

    #[test]
    fn test_error_creation() {
        let err = HcoError::resource_not_found("hco.kubevirt.io/v1beta1/HyperConverged/kubevirt-hyperconverged");
        assert!(matches!(err, HcoError::ResourceNotFound { .. }));

        let err = HcoError::invalid_resource("missing name", "Set metadata.name");
        assert!(err.to_string().contains("missing name"));
    }

    #[test]
    fn test_resource_error_conversion() {
        let err: HcoError = ResourceError::MissingField("metadata.name".to_string()).into();
        assert!(matches!(err, HcoError::InvalidResource { .. }));
    }
}
