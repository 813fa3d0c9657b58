use async_trait::async_trait;
use gift_lists_sdk::{GiftItem, ItemLink, ItemPatch, Priority};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::SnapshotStream;
use crate::domain::error::DomainError;

/// A new, unpurchased item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub list_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub links: Vec<ItemLink>,
    pub estimated_price: Decimal,
    pub notes: String,
    pub priority: Priority,
    pub created_by: Uuid,
}

/// Repository trait for the `items` collection.
#[async_trait]
pub trait ItemsRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<GiftItem>, DomainError>;

    /// Items of a list, newest first.
    async fn list_for_list(&self, list_id: Uuid) -> Result<Vec<GiftItem>, DomainError>;

    async fn watch_for_list(&self, list_id: Uuid)
    -> Result<SnapshotStream<GiftItem>, DomainError>;

    async fn create(&self, draft: ItemDraft) -> Result<GiftItem, DomainError>;

    async fn update(&self, id: Uuid, patch: &ItemPatch) -> Result<(), DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Sets the purchased flag, purchaser and a service-assigned purchase
    /// time in one write.
    async fn mark_purchased(&self, id: Uuid, purchased_by: Uuid) -> Result<(), DomainError>;

    /// Clears the purchased flag, purchaser and purchase time in one write.
    async fn mark_unpurchased(&self, id: Uuid) -> Result<(), DomainError>;
}
