use std::collections::BTreeSet;

use async_trait::async_trait;
use gift_lists_sdk::{GiftGroup, GroupPatch};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::SnapshotStream;
use crate::domain::error::DomainError;

/// A group as written by the service layer, before the data service assigns
/// id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDraft {
    pub name: String,
    pub year: i32,
    pub owner_id: Uuid,
    pub member_ids: BTreeSet<Uuid>,
    pub overall_budget: Decimal,
    pub is_active: bool,
}

/// Repository trait for the `groups` collection.
#[async_trait]
pub trait GroupsRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<GiftGroup>, DomainError>;

    /// Groups whose member ids contain `user_id`, newest year first.
    async fn list_for_member(&self, user_id: Uuid) -> Result<Vec<GiftGroup>, DomainError>;

    /// Live variant of [`GroupsRepository::list_for_member`].
    async fn watch_for_member(
        &self,
        user_id: Uuid,
    ) -> Result<SnapshotStream<GiftGroup>, DomainError>;

    async fn create(&self, draft: GroupDraft) -> Result<GiftGroup, DomainError>;

    async fn update(&self, id: Uuid, patch: &GroupPatch) -> Result<(), DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Array-union of `user_id` into member ids.
    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError>;

    /// Array-remove of `user_id` from member ids.
    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError>;
}
