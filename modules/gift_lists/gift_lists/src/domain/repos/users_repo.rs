use async_trait::async_trait;
use gift_lists_sdk::{NewUser, User, UserPatch};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Repository trait for the `users` profile collection.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Write a profile keyed by the identity id.
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError>;

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), DomainError>;
}
