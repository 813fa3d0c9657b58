use std::collections::BTreeSet;

use async_trait::async_trait;
use gift_lists_sdk::{GiftList, ListPatch};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::SnapshotStream;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDraft {
    pub group_id: Uuid,
    pub recipient_name: String,
    pub recipient_id: Option<Uuid>,
    pub budget: Decimal,
    pub created_by: Uuid,
    pub collaborator_ids: BTreeSet<Uuid>,
}

/// Repository trait for the `lists` collection.
#[async_trait]
pub trait ListsRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<GiftList>, DomainError>;

    /// Lists of a group, newest first.
    async fn list_for_group(&self, group_id: Uuid) -> Result<Vec<GiftList>, DomainError>;

    async fn watch_for_group(
        &self,
        group_id: Uuid,
    ) -> Result<SnapshotStream<GiftList>, DomainError>;

    async fn create(&self, draft: ListDraft) -> Result<GiftList, DomainError>;

    async fn update(&self, id: Uuid, patch: &ListPatch) -> Result<(), DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    async fn add_collaborator(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError>;

    async fn remove_collaborator(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError>;
}
