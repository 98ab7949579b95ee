use crate::call::CallStatus;
use crate::store::StorageError;
use crate::types::CallId;
use crate::validation::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {}", summarize_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: CallId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: CallStatus, to: CallStatus },

    #[error("Configuration missing: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}
