//! Local implementation of `GiftListsClient`.
//!
//! Used for in-process consumers. It delegates to the domain services and
//! converts errors to SDK error types.

use std::sync::Arc;

use async_trait::async_trait;
use gift_lists_sdk::{
    Actor, GiftGroup, GiftItem, GiftList, GiftListsClient, GiftListsError, GroupBudget,
    GroupPatch, ItemPatch, ListPatch, NewGroup, NewItem, NewList, User, UserPatch,
};
use uuid::Uuid;

use crate::domain::service::AppServices;

/// Local implementation of the `GiftListsClient` trait that delegates to the
/// domain services.
pub struct GiftListsLocalClient {
    services: Arc<AppServices>,
}

impl GiftListsLocalClient {
    #[must_use]
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl GiftListsClient for GiftListsLocalClient {
    // Users

    async fn get_user(&self, _actor: Actor, id: Uuid) -> Result<User, GiftListsError> {
        self.services.users.get_user(id).await.map_err(Into::into)
    }

    async fn update_user(&self, actor: Actor, patch: UserPatch) -> Result<(), GiftListsError> {
        self.services
            .users
            .update_user(actor, patch)
            .await
            .map_err(Into::into)
    }

    // Groups

    async fn get_group(&self, actor: Actor, id: Uuid) -> Result<GiftGroup, GiftListsError> {
        self.services
            .groups
            .get_group(actor, id)
            .await
            .map_err(Into::into)
    }

    async fn list_groups(&self, actor: Actor) -> Result<Vec<GiftGroup>, GiftListsError> {
        self.services
            .groups
            .list_groups_for_member(actor)
            .await
            .map_err(Into::into)
    }

    async fn create_group(
        &self,
        actor: Actor,
        new_group: NewGroup,
    ) -> Result<GiftGroup, GiftListsError> {
        self.services
            .groups
            .create_group(actor, new_group)
            .await
            .map_err(Into::into)
    }

    async fn update_group(
        &self,
        actor: Actor,
        id: Uuid,
        patch: GroupPatch,
    ) -> Result<(), GiftListsError> {
        self.services
            .groups
            .update_group(actor, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_group(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError> {
        self.services
            .groups
            .delete_group(actor, id)
            .await
            .map_err(Into::into)
    }

    async fn add_member(
        &self,
        actor: Actor,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError> {
        self.services
            .groups
            .add_member(actor, group_id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn remove_member(
        &self,
        actor: Actor,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError> {
        self.services
            .groups
            .remove_member(actor, group_id, user_id)
            .await
            .map_err(Into::into)
    }

    // Lists

    async fn get_list(&self, actor: Actor, id: Uuid) -> Result<GiftList, GiftListsError> {
        self.services
            .lists
            .get_list(actor, id)
            .await
            .map_err(Into::into)
    }

    async fn list_lists(
        &self,
        actor: Actor,
        group_id: Uuid,
    ) -> Result<Vec<GiftList>, GiftListsError> {
        self.services
            .lists
            .list_lists_for_group(actor, group_id)
            .await
            .map_err(Into::into)
    }

    async fn create_list(
        &self,
        actor: Actor,
        new_list: NewList,
    ) -> Result<GiftList, GiftListsError> {
        self.services
            .lists
            .create_list(actor, new_list)
            .await
            .map_err(Into::into)
    }

    async fn update_list(
        &self,
        actor: Actor,
        id: Uuid,
        patch: ListPatch,
    ) -> Result<(), GiftListsError> {
        self.services
            .lists
            .update_list(actor, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_list(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError> {
        self.services
            .lists
            .delete_list(actor, id)
            .await
            .map_err(Into::into)
    }

    async fn add_collaborator(
        &self,
        actor: Actor,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError> {
        self.services
            .lists
            .add_collaborator(actor, list_id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn remove_collaborator(
        &self,
        actor: Actor,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError> {
        self.services
            .lists
            .remove_collaborator(actor, list_id, user_id)
            .await
            .map_err(Into::into)
    }

    // Items

    async fn get_item(&self, actor: Actor, id: Uuid) -> Result<GiftItem, GiftListsError> {
        self.services
            .items
            .get_item(actor, id)
            .await
            .map_err(Into::into)
    }

    async fn list_items(
        &self,
        actor: Actor,
        list_id: Uuid,
    ) -> Result<Vec<GiftItem>, GiftListsError> {
        self.services
            .items
            .list_items_for_list(actor, list_id)
            .await
            .map_err(Into::into)
    }

    async fn create_item(
        &self,
        actor: Actor,
        new_item: NewItem,
    ) -> Result<GiftItem, GiftListsError> {
        self.services
            .items
            .create_item(actor, new_item)
            .await
            .map_err(Into::into)
    }

    async fn update_item(
        &self,
        actor: Actor,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<(), GiftListsError> {
        self.services
            .items
            .update_item(actor, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_item(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError> {
        self.services
            .items
            .delete_item(actor, id)
            .await
            .map_err(Into::into)
    }

    async fn mark_purchased(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError> {
        self.services
            .items
            .mark_purchased(actor, id)
            .await
            .map_err(Into::into)
    }

    async fn mark_unpurchased(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError> {
        self.services
            .items
            .mark_unpurchased(actor, id)
            .await
            .map_err(Into::into)
    }

    // Budget

    async fn group_budget(
        &self,
        actor: Actor,
        group_id: Uuid,
    ) -> Result<GroupBudget, GiftListsError> {
        self.services
            .group_budget(actor, group_id)
            .await
            .map_err(Into::into)
    }
}
