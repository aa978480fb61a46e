use miette::Diagnostic;
use thiserror::Error;

/// Error type for operand reconciliation
#[derive(Error, Debug, Diagnostic)]
pub enum OperandError {
    /// Live or desired object is not of the operand's resource type
    #[error("Can't convert to {expected}: got {found}")]
    #[diagnostic(
        code(hco::operands::type_mismatch),
        help("The operand was handed an object of the wrong kind. This is a bug in the operand wiring")
    )]
    TypeMismatch {
        #[allow(unused)]
        expected: String,
        #[allow(unused)]
        found: String,
    },

    /// JSON patch annotation could not be decoded or applied
    #[error("Invalid JSON patch in annotation '{annotation}': {message}")]
    #[diagnostic(
        code(hco::operands::invalid_patch),
        help("The annotation must hold an RFC 6902 JSON patch array whose operations only touch paths under /spec/")
    )]
    InvalidPatch {
        #[allow(unused)]
        annotation: String,
        #[allow(unused)]
        message: String,
    },

    /// API request failed
    #[error("{method} {path} failed: {message}")]
    #[diagnostic(
        code(hco::operands::api_request_failed),
        help("Check that the API server is reachable. The reconcile pass will be requeued")
    )]
    ApiRequestFailed {
        #[allow(unused)]
        method: String,
        #[allow(unused)]
        path: String,
        #[allow(unused)]
        message: String,
    },

    /// Request was cancelled before the operation completed
    #[error("Operation cancelled: {operation}")]
    #[diagnostic(
        code(hco::operands::cancelled),
        help("The reconcile request was cancelled; no changes were sent")
    )]
    Cancelled {
        #[allow(unused)]
        operation: String,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    #[diagnostic(
        code(hco::operands::internal_error),
        help("This is likely a bug. Please report it with the full error details")
    )]
    InternalError {
        #[allow(unused)]
        message: String,
    },

    /// Core library error
    #[error(transparent)]
    #[diagnostic(transparent)]
    CoreError(#[from] hco_core::HcoError),
}

/// Result type for operand operations
pub type Result<T> = std::result::Result<T, OperandError>;

impl OperandError {
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_patch(annotation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPatch {
            annotation: annotation.into(),
            message: message.into(),
        }
    }

    pub fn api_request_failed(
        method: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ApiRequestFailed {
            method: method.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<hco_core::ResourceError> for OperandError {
    fn from(err: hco_core::ResourceError) -> Self {
        Self::CoreError(err.into())
    }
}
