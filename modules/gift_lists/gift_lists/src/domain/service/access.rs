//! Record loading and access checks shared by the services.

use gift_lists_sdk::{Actor, EntityKind, GiftGroup, GiftItem, GiftList};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{GroupsRepository, ItemsRepository, ListsRepository};

pub(super) async fn load_group(
    repo: &dyn GroupsRepository,
    id: Uuid,
) -> Result<GiftGroup, DomainError> {
    repo.get(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Group, id))
}

pub(super) async fn load_list(
    repo: &dyn ListsRepository,
    id: Uuid,
) -> Result<GiftList, DomainError> {
    repo.get(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::List, id))
}

pub(super) async fn load_item(
    repo: &dyn ItemsRepository,
    id: Uuid,
) -> Result<GiftItem, DomainError> {
    repo.get(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Item, id))
}

pub(super) fn ensure_member(group: &GiftGroup, actor: Actor) -> Result<(), DomainError> {
    if group.is_member(actor.user_id()) {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "not a member of group {}",
            group.id
        )))
    }
}

pub(super) fn ensure_owner(
    group: &GiftGroup,
    actor: Actor,
    action: &str,
) -> Result<(), DomainError> {
    if group.owner_id == actor.user_id() {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "only the group owner can {action}"
        )))
    }
}

/// Creator, collaborator or owner of the parent group.
pub(super) fn ensure_list_editor(
    group: &GiftGroup,
    list: &GiftList,
    actor: Actor,
) -> Result<(), DomainError> {
    if list.is_editor(actor.user_id()) || group.owner_id == actor.user_id() {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "cannot edit list {}",
            list.id
        )))
    }
}
