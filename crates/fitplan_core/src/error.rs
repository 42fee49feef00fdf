//! Error types shared by the resolver and relay handlers

use thiserror::Error;

/// Failures reported by a record store adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A conditional write was rejected by the table
    #[error("conditional check failed")]
    ConditionFailed,

    /// The table's environment variable is empty
    #[error("{0} must be configured")]
    Misconfigured(&'static str),

    #[error("{0}")]
    Backend(String),
}

/// Errors surfaced to the caller of a resolver or relay request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{entity} not found for {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} already exists for {key}")]
    AlreadyExists { entity: &'static str, key: String },

    #[error("Unrecognized operation: {0}")]
    UnrecognizedOperation(String),

    #[error("Failed to extract JSON from model response: {0}")]
    Extraction(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0} must be configured")]
    Misconfiguration(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Model invocation failed: {0}")]
    Model(String),

    #[error("Failed to publish notification: {0}")]
    Publish(String),

    #[error("Failed to render prompt: {0}")]
    Prompt(String),

    #[error("Failed to serialize result: {0}")]
    Serialization(String),
}

impl ServiceError {
    /// Stable error category name reported alongside the message
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFound",
            Self::AlreadyExists { .. } => "AlreadyExists",
            Self::UnrecognizedOperation(_) => "UnrecognizedOperation",
            Self::Extraction(_) => "ExtractionError",
            Self::InvalidPayload(_) => "InvalidPayload",
            Self::InvalidArguments(_) => "InvalidArguments",
            Self::Misconfiguration(_) => "Misconfiguration",
            Self::Store(_) => "StoreError",
            Self::Model(_) => "ModelError",
            Self::Publish(_) => "PublishError",
            Self::Prompt(_) => "PromptError",
            Self::Serialization(_) => "SerializationError",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Misconfigured(variable) => Self::Misconfiguration(variable.to_string()),
            other => Self::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_operation_names_the_field() {
        let error = ServiceError::UnrecognizedOperation("bogusField".to_string());
        assert_eq!(error.to_string(), "Unrecognized operation: bogusField");
        assert_eq!(error.error_type(), "UnrecognizedOperation");
    }

    #[test]
    fn store_errors_keep_backend_message() {
        let error = ServiceError::from(StoreError::Backend("throttled".to_string()));
        assert_eq!(error, ServiceError::Store("throttled".to_string()));
    }

    #[test]
    fn unconfigured_table_maps_to_misconfiguration() {
        let error = ServiceError::from(StoreError::Misconfigured("DIET_PLAN_TABLE"));
        assert_eq!(error.error_type(), "Misconfiguration");
        assert_eq!(error.to_string(), "DIET_PLAN_TABLE must be configured");
    }
}
