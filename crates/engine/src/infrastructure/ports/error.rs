//! Error types for port operations.

use mechanist_domain::TagError;

/// Host operation errors with context for debugging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Handle does not point at anything - includes entity type and ID.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The host refused a write - includes operation name for tracing.
    #[error("Host rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
}

impl HostError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Rejected error with operation context.
    pub fn rejected(operation: &'static str, message: impl ToString) -> Self {
        Self::Rejected {
            operation,
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<HostError> for TagError {
    fn from(err: HostError) -> Self {
        TagError::host(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_tag_error() {
        let err: TagError = HostError::not_found("Item", "abc").into();
        assert_eq!(err, TagError::Host("Item not found: abc".to_string()));
    }
}
