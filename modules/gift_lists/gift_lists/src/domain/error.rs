use gift_lists_sdk::{EntityKind, GiftListsError};
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: Uuid },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Remote service error: {message}")]
    Remote { message: String },
}

impl DomainError {
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for GiftListsError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::NotFound { entity, id } => GiftListsError::not_found(entity, id),
            DomainError::Validation { field, message } => {
                GiftListsError::validation(format!("{field}: {message}"))
            }
            DomainError::Forbidden { message } => GiftListsError::forbidden(message),
            DomainError::Auth { message } => GiftListsError::auth(message),
            DomainError::Remote { message } => GiftListsError::remote(message),
        }
    }
}
