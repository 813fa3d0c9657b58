use std::sync::Arc;

use gift_lists_sdk::{Actor, GiftGroup, GiftList, ListPatch, NewList};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceConfig;
use super::access::{ensure_list_editor, ensure_member, load_group, load_list};
use crate::domain::error::DomainError;
use crate::domain::repos::{GroupsRepository, ListDraft, ListsRepository};

pub struct ListsService {
    repo: Arc<dyn ListsRepository>,
    groups: Arc<dyn GroupsRepository>,
    config: Arc<ServiceConfig>,
}

impl ListsService {
    pub(super) fn new(
        repo: Arc<dyn ListsRepository>,
        groups: Arc<dyn GroupsRepository>,
        config: Arc<ServiceConfig>,
    ) -> Self {
        Self {
            repo,
            groups,
            config,
        }
    }

    /// Loads a list and its group.
    async fn load(&self, id: Uuid) -> Result<(GiftList, GiftGroup), DomainError> {
        let list = load_list(self.repo.as_ref(), id).await?;
        let group = load_group(self.groups.as_ref(), list.group_id).await?;
        Ok((list, group))
    }

    #[instrument(skip(self, actor), fields(list_id = %id))]
    pub async fn get_list(&self, actor: Actor, id: Uuid) -> Result<GiftList, DomainError> {
        debug!("Getting list by id");
        let (list, group) = self.load(id).await?;
        ensure_member(&group, actor)?;
        Ok(list)
    }

    /// Lists of a group, newest first.
    #[instrument(skip(self, actor), fields(group_id = %group_id))]
    pub async fn list_lists_for_group(
        &self,
        actor: Actor,
        group_id: Uuid,
    ) -> Result<Vec<GiftList>, DomainError> {
        let group = load_group(self.groups.as_ref(), group_id).await?;
        ensure_member(&group, actor)?;

        let lists = self.repo.list_for_group(group_id).await?;
        debug!("Listed {} lists", lists.len());
        Ok(lists)
    }

    #[instrument(
        skip(self, actor, new_list),
        fields(group_id = %new_list.group_id, recipient = %new_list.recipient_name)
    )]
    pub async fn create_list(
        &self,
        actor: Actor,
        new_list: NewList,
    ) -> Result<GiftList, DomainError> {
        info!("Creating new list");
        self.config.validator().new_list(&new_list)?;
        let group = load_group(self.groups.as_ref(), new_list.group_id).await?;
        ensure_member(&group, actor)?;
        if let Some(outsider) = new_list
            .collaborator_ids
            .iter()
            .find(|id| !group.is_member(**id))
        {
            return Err(DomainError::validation(
                "collaborator_ids",
                format!("{outsider} is not a member of the group"),
            ));
        }

        let list = self
            .repo
            .create(ListDraft {
                group_id: new_list.group_id,
                recipient_name: new_list.recipient_name.trim().to_owned(),
                recipient_id: new_list.recipient_id,
                budget: new_list.budget,
                created_by: actor.user_id(),
                collaborator_ids: new_list.collaborator_ids,
            })
            .await?;

        info!("Successfully created list with id={}", list.id);
        Ok(list)
    }

    #[instrument(skip(self, actor, patch), fields(list_id = %id))]
    pub async fn update_list(
        &self,
        actor: Actor,
        id: Uuid,
        mut patch: ListPatch,
    ) -> Result<(), DomainError> {
        info!("Updating list");
        self.config.validator().list_patch(&patch)?;
        let (list, group) = self.load(id).await?;
        ensure_list_editor(&group, &list, actor)?;

        patch.recipient_name = patch.recipient_name.map(|n| n.trim().to_owned());
        self.repo.update(id, &patch).await?;
        info!("Successfully updated list");
        Ok(())
    }

    /// Hard delete. Items of the list are left in place.
    #[instrument(skip(self, actor), fields(list_id = %id))]
    pub async fn delete_list(&self, actor: Actor, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting list");
        let (list, group) = self.load(id).await?;
        ensure_list_editor(&group, &list, actor)?;

        self.repo.delete(id).await?;
        info!("Successfully deleted list");
        Ok(())
    }

    /// Collaborators must already be members of the list's group.
    #[instrument(skip(self, actor), fields(list_id = %list_id, collaborator_id = %user_id))]
    pub async fn add_collaborator(
        &self,
        actor: Actor,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let (list, group) = self.load(list_id).await?;
        ensure_list_editor(&group, &list, actor)?;
        if !group.is_member(user_id) {
            return Err(DomainError::validation(
                "collaborator_ids",
                format!("{user_id} is not a member of the group"),
            ));
        }

        self.repo.add_collaborator(list_id, user_id).await?;
        info!("Added list collaborator");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(list_id = %list_id, collaborator_id = %user_id))]
    pub async fn remove_collaborator(
        &self,
        actor: Actor,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let (list, group) = self.load(list_id).await?;
        ensure_list_editor(&group, &list, actor)?;

        self.repo.remove_collaborator(list_id, user_id).await?;
        info!("Removed list collaborator");
        Ok(())
    }
}
