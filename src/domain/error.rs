use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: String, key: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Duplicate {field}: {value}")]
    Duplicate { field: String, value: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The offending field for duplicate errors, used for API diagnostics
    pub fn duplicate_field(&self) -> Option<&str> {
        match self {
            Self::Duplicate { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User", "abc-123");
        assert_eq!(error.to_string(), "User 'abc-123' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_duplicate_error() {
        let error = DomainError::duplicate("phone_number", "89001234567");
        assert_eq!(error.to_string(), "Duplicate phone_number: 89001234567");
        assert_eq!(error.duplicate_field(), Some("phone_number"));
    }

    #[test]
    fn test_duplicate_field_on_other_kinds() {
        assert!(DomainError::storage("down").duplicate_field().is_none());
    }
}
