//! Public error types for the `gift_lists` module.
//!
//! These errors are safe to expose to other modules and consumers.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Record kinds, one per document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Group,
    List,
    Item,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::List => "list",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can be returned by the `GiftListsClient`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GiftListsError {
    /// The requested record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: Uuid },

    /// Input rejected before it reached the data service.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The acting user may not perform this operation.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// The authentication service refused the request.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The remote data service failed the request.
    #[error("Remote service error: {message}")]
    Remote { message: String },
}

impl GiftListsError {
    #[must_use]
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
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
}
