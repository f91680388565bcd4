//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Lookup target absent, or an empty result set on list/search.
    /// Carries the entity type and the key that missed for actionable
    /// error messages.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Insert collision on the identity key.
    #[error("{name} already exists")]
    AlreadyExists { name: String },

    /// Caller-supplied input rejected before any store call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Store operation failed - includes operation name for tracing.
    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and key context.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Create an AlreadyExists error for an insert collision.
    pub fn already_exists(name: impl ToString) -> Self {
        Self::AlreadyExists {
            name: name.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Validation error.
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
