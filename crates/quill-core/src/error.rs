//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed on `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Only the author may modify this resource")]
    PermissionDenied,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: i32) -> Self {
        Self::NotFound { entity_type, id }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// Uniqueness violation.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A foreign key names a row that does not exist.
    #[error("Reference violation: {0}")]
    Reference(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            // Services that write references resolve these themselves.
            other => DomainError::Internal(other.to_string()),
        }
    }
}
