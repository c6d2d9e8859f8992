//! Error types for port operations.

use fartrek_domain::{DomainError, PatchError};

/// Repository operation errors with context for debugging.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A guarded field changed between read and write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Business constraint violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict(message.to_string())
    }

    /// Create a ConstraintViolation error.
    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<PatchError> for RepoError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::GuardFailed { .. } => Self::Conflict(err.to_string()),
            PatchError::Invalid(DomainError::NotFound { entity_type, id }) => {
                Self::NotFound { entity_type, id }
            }
            PatchError::Invalid(other) => Self::ConstraintViolation(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AnnouncementError {
    #[error("Announcement failed: {0}")]
    Failed(String),
}
