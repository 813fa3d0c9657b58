use std::sync::Arc;

use gift_lists_sdk::{Actor, GiftItem, ItemPatch, NewItem};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceConfig;
use super::access::{ensure_member, load_group, load_item, load_list};
use crate::domain::error::DomainError;
use crate::domain::repos::{GroupsRepository, ItemDraft, ItemsRepository, ListsRepository};

pub struct ItemsService {
    repo: Arc<dyn ItemsRepository>,
    lists: Arc<dyn ListsRepository>,
    groups: Arc<dyn GroupsRepository>,
    config: Arc<ServiceConfig>,
}

impl ItemsService {
    pub(super) fn new(
        repo: Arc<dyn ItemsRepository>,
        lists: Arc<dyn ListsRepository>,
        groups: Arc<dyn GroupsRepository>,
        config: Arc<ServiceConfig>,
    ) -> Self {
        Self {
            repo,
            lists,
            groups,
            config,
        }
    }

    /// Any member of the list's group may read and write its items.
    async fn ensure_list_access(&self, actor: Actor, list_id: Uuid) -> Result<(), DomainError> {
        let list = load_list(self.lists.as_ref(), list_id).await?;
        let group = load_group(self.groups.as_ref(), list.group_id).await?;
        ensure_member(&group, actor)
    }

    async fn load_accessible(&self, actor: Actor, id: Uuid) -> Result<GiftItem, DomainError> {
        let item = load_item(self.repo.as_ref(), id).await?;
        self.ensure_list_access(actor, item.list_id).await?;
        Ok(item)
    }

    #[instrument(skip(self, actor), fields(item_id = %id))]
    pub async fn get_item(&self, actor: Actor, id: Uuid) -> Result<GiftItem, DomainError> {
        debug!("Getting item by id");
        self.load_accessible(actor, id).await
    }

    /// Items of a list, newest first.
    #[instrument(skip(self, actor), fields(list_id = %list_id))]
    pub async fn list_items_for_list(
        &self,
        actor: Actor,
        list_id: Uuid,
    ) -> Result<Vec<GiftItem>, DomainError> {
        self.ensure_list_access(actor, list_id).await?;
        let items = self.repo.list_for_list(list_id).await?;
        debug!("Listed {} items", items.len());
        Ok(items)
    }

    /// New items start unpurchased.
    #[instrument(skip(self, actor, new_item), fields(list_id = %new_item.list_id, title = %new_item.title))]
    pub async fn create_item(
        &self,
        actor: Actor,
        new_item: NewItem,
    ) -> Result<GiftItem, DomainError> {
        info!("Creating new item");
        self.config.validator().new_item(&new_item)?;
        self.ensure_list_access(actor, new_item.list_id).await?;

        let item = self
            .repo
            .create(ItemDraft {
                list_id: new_item.list_id,
                title: new_item.title.trim().to_owned(),
                description: new_item.description,
                image_url: new_item.image_url,
                links: new_item.links,
                estimated_price: new_item.estimated_price,
                notes: new_item.notes,
                priority: new_item.priority,
                created_by: actor.user_id(),
            })
            .await?;

        info!("Successfully created item with id={}", item.id);
        Ok(item)
    }

    #[instrument(skip(self, actor, patch), fields(item_id = %id))]
    pub async fn update_item(
        &self,
        actor: Actor,
        id: Uuid,
        mut patch: ItemPatch,
    ) -> Result<(), DomainError> {
        info!("Updating item");
        self.config.validator().item_patch(&patch)?;
        self.load_accessible(actor, id).await?;

        patch.title = patch.title.map(|t| t.trim().to_owned());
        self.repo.update(id, &patch).await?;
        info!("Successfully updated item");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(item_id = %id))]
    pub async fn delete_item(&self, actor: Actor, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting item");
        self.load_accessible(actor, id).await?;

        self.repo.delete(id).await?;
        info!("Successfully deleted item");
        Ok(())
    }

    /// Purchaser is the actor; the purchase time is assigned by the store.
    #[instrument(skip(self, actor), fields(item_id = %id, purchased_by = %actor.user_id()))]
    pub async fn mark_purchased(&self, actor: Actor, id: Uuid) -> Result<(), DomainError> {
        self.load_accessible(actor, id).await?;

        self.repo.mark_purchased(id, actor.user_id()).await?;
        info!("Marked item purchased");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(item_id = %id))]
    pub async fn mark_unpurchased(&self, actor: Actor, id: Uuid) -> Result<(), DomainError> {
        self.load_accessible(actor, id).await?;

        self.repo.mark_unpurchased(id).await?;
        info!("Marked item unpurchased");
        Ok(())
    }
}
