use std::sync::Arc;

use gift_lists_sdk::{Actor, GiftGroup, GroupPatch, NewGroup};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceConfig;
use super::access::{ensure_member, ensure_owner, load_group};
use crate::domain::error::DomainError;
use crate::domain::repos::{GroupDraft, GroupsRepository};

pub struct GroupsService {
    repo: Arc<dyn GroupsRepository>,
    config: Arc<ServiceConfig>,
}

impl GroupsService {
    pub(super) fn new(repo: Arc<dyn GroupsRepository>, config: Arc<ServiceConfig>) -> Self {
        Self { repo, config }
    }

    #[instrument(skip(self, actor), fields(group_id = %id))]
    pub async fn get_group(&self, actor: Actor, id: Uuid) -> Result<GiftGroup, DomainError> {
        debug!("Getting group by id");
        let group = load_group(self.repo.as_ref(), id).await?;
        ensure_member(&group, actor)?;
        Ok(group)
    }

    /// Groups the actor belongs to, newest year first.
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id()))]
    pub async fn list_groups_for_member(
        &self,
        actor: Actor,
    ) -> Result<Vec<GiftGroup>, DomainError> {
        let groups = self.repo.list_for_member(actor.user_id()).await?;
        debug!("Listed {} groups", groups.len());
        Ok(groups)
    }

    /// The actor becomes owner and first member; the group starts active.
    #[instrument(skip(self, actor, new_group), fields(name = %new_group.name, year = new_group.year))]
    pub async fn create_group(
        &self,
        actor: Actor,
        new_group: NewGroup,
    ) -> Result<GiftGroup, DomainError> {
        info!("Creating new group");
        self.config.validator().new_group(&new_group)?;

        let mut member_ids = new_group.member_ids;
        member_ids.insert(actor.user_id());

        let group = self
            .repo
            .create(GroupDraft {
                name: new_group.name.trim().to_owned(),
                year: new_group.year,
                owner_id: actor.user_id(),
                member_ids,
                overall_budget: new_group.overall_budget,
                is_active: true,
            })
            .await?;

        info!("Successfully created group with id={}", group.id);
        Ok(group)
    }

    #[instrument(skip(self, actor, patch), fields(group_id = %id))]
    pub async fn update_group(
        &self,
        actor: Actor,
        id: Uuid,
        mut patch: GroupPatch,
    ) -> Result<(), DomainError> {
        info!("Updating group");
        self.config.validator().group_patch(&patch)?;
        let group = load_group(self.repo.as_ref(), id).await?;
        ensure_owner(&group, actor, "update the group")?;

        patch.name = patch.name.map(|n| n.trim().to_owned());
        self.repo.update(id, &patch).await?;
        info!("Successfully updated group");
        Ok(())
    }

    /// Hard delete. Lists and items of the group are left in place.
    #[instrument(skip(self, actor), fields(group_id = %id))]
    pub async fn delete_group(&self, actor: Actor, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting group");
        let group = load_group(self.repo.as_ref(), id).await?;
        ensure_owner(&group, actor, "delete the group")?;

        self.repo.delete(id).await?;
        info!("Successfully deleted group");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(group_id = %group_id, member_id = %user_id))]
    pub async fn add_member(
        &self,
        actor: Actor,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let group = load_group(self.repo.as_ref(), group_id).await?;
        ensure_owner(&group, actor, "add members")?;
        if group.is_member(user_id) {
            debug!("Already a member");
            return Ok(());
        }

        self.repo.add_member(group_id, user_id).await?;
        info!("Added group member");
        Ok(())
    }

    /// The owner can remove anyone but themselves; other members can only
    /// leave.
    #[instrument(skip(self, actor), fields(group_id = %group_id, member_id = %user_id))]
    pub async fn remove_member(
        &self,
        actor: Actor,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        let group = load_group(self.repo.as_ref(), group_id).await?;
        if user_id == group.owner_id {
            return Err(DomainError::validation(
                "member_ids",
                "the group owner cannot be removed",
            ));
        }
        if actor.user_id() != user_id {
            ensure_owner(&group, actor, "remove other members")?;
        }

        self.repo.remove_member(group_id, user_id).await?;
        info!("Removed group member");
        Ok(())
    }
}
