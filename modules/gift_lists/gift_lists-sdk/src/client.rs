//! Object-safe client boundary for the `gift_lists` module.
//!
//! Designed to be held as `Arc<dyn GiftListsClient>` by in-process consumers.

use async_trait::async_trait;
use uuid::Uuid;

use crate::budget::GroupBudget;
use crate::errors::GiftListsError;
use crate::models::{
    Actor, GiftGroup, GiftItem, GiftList, GroupPatch, ItemPatch, ListPatch, NewGroup, NewItem,
    NewList, User, UserPatch,
};

#[async_trait]
pub trait GiftListsClient: Send + Sync {
    // ==================== Users ====================

    async fn get_user(&self, actor: Actor, id: Uuid) -> Result<User, GiftListsError>;

    /// Update the acting user's own profile.
    async fn update_user(&self, actor: Actor, patch: UserPatch) -> Result<(), GiftListsError>;

    // ==================== Groups ====================

    async fn get_group(&self, actor: Actor, id: Uuid) -> Result<GiftGroup, GiftListsError>;

    /// Groups the acting user belongs to, newest year first.
    async fn list_groups(&self, actor: Actor) -> Result<Vec<GiftGroup>, GiftListsError>;

    async fn create_group(
        &self,
        actor: Actor,
        new_group: NewGroup,
    ) -> Result<GiftGroup, GiftListsError>;

    async fn update_group(
        &self,
        actor: Actor,
        id: Uuid,
        patch: GroupPatch,
    ) -> Result<(), GiftListsError>;

    async fn delete_group(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError>;

    async fn add_member(
        &self,
        actor: Actor,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError>;

    async fn remove_member(
        &self,
        actor: Actor,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError>;

    // ==================== Lists ====================

    async fn get_list(&self, actor: Actor, id: Uuid) -> Result<GiftList, GiftListsError>;

    async fn list_lists(
        &self,
        actor: Actor,
        group_id: Uuid,
    ) -> Result<Vec<GiftList>, GiftListsError>;

    async fn create_list(&self, actor: Actor, new_list: NewList)
    -> Result<GiftList, GiftListsError>;

    async fn update_list(
        &self,
        actor: Actor,
        id: Uuid,
        patch: ListPatch,
    ) -> Result<(), GiftListsError>;

    async fn delete_list(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError>;

    async fn add_collaborator(
        &self,
        actor: Actor,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError>;

    async fn remove_collaborator(
        &self,
        actor: Actor,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), GiftListsError>;

    // ==================== Items ====================

    async fn get_item(&self, actor: Actor, id: Uuid) -> Result<GiftItem, GiftListsError>;

    async fn list_items(
        &self,
        actor: Actor,
        list_id: Uuid,
    ) -> Result<Vec<GiftItem>, GiftListsError>;

    async fn create_item(&self, actor: Actor, new_item: NewItem)
    -> Result<GiftItem, GiftListsError>;

    async fn update_item(
        &self,
        actor: Actor,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<(), GiftListsError>;

    async fn delete_item(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError>;

    /// Mark purchased by the acting user.
    async fn mark_purchased(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError>;

    async fn mark_unpurchased(&self, actor: Actor, id: Uuid) -> Result<(), GiftListsError>;

    // ==================== Budget ====================

    /// Full budget report for a group, reading every list and item in it.
    async fn group_budget(
        &self,
        actor: Actor,
        group_id: Uuid,
    ) -> Result<GroupBudget, GiftListsError>;
}
