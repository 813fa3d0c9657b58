use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::Ordering as AtomicOrdering;

use async_trait::async_trait;
use gift_lists_sdk::{
    EntityKind, GiftGroup, GiftItem, GiftList, GroupPatch, ItemPatch, ListPatch, NewUser,
    Purchase, User, UserPatch,
};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::collection::{Collection, Faults};
use crate::domain::error::DomainError;
use crate::domain::repos::{
    GroupDraft, GroupsRepository, ItemDraft, ItemsRepository, ListDraft, ListsRepository,
    SnapshotStream, UsersRepository,
};

/// In-process document store implementing every repository port.
///
/// Ids are UUIDv7 and timestamps are assigned here, the way a managed
/// document service stamps server time. Live queries re-run their filter on
/// every change to the collection and deliver the full result set.
pub struct MemoryStore {
    groups: Collection<GiftGroup>,
    lists: Collection<GiftList>,
    items: Collection<GiftItem>,
    users: Collection<User>,
    faults: Arc<Faults>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn by_year_then_newest(a: &GiftGroup, b: &GiftGroup) -> Ordering {
    b.year
        .cmp(&a.year)
        .then(b.created_at.cmp(&a.created_at))
        .then(b.id.cmp(&a.id))
}

fn newest_list(a: &GiftList, b: &GiftList) -> Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

fn newest_item(a: &GiftItem, b: &GiftItem) -> Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

fn oldest_user(a: &User, b: &User) -> Ordering {
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: Collection::new(by_year_then_newest),
            lists: Collection::new(newest_list),
            items: Collection::new(newest_item),
            users: Collection::new(oldest_user),
            faults: Arc::new(Faults::default()),
        }
    }

    /// While set, every read and write fails with a remote error. Live
    /// queries already registered keep running.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults
            .unavailable
            .store(unavailable, AtomicOrdering::Release);
    }

    /// While set, live queries (new and already registered) deliver one
    /// error and end.
    pub fn reject_subscriptions(&self, rejected: bool) {
        self.faults
            .subscriptions_rejected
            .store(rejected, AtomicOrdering::Release);
        if rejected {
            self.groups.bump();
            self.lists.bump();
            self.items.bump();
            self.users.bump();
        }
    }

    /// Number of live queries currently registered across all collections.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.groups.listener_count()
            + self.lists.listener_count()
            + self.items.listener_count()
            + self.users.listener_count()
    }

    fn stamp() -> (Uuid, OffsetDateTime) {
        (Uuid::now_v7(), OffsetDateTime::now_utc())
    }
}

#[async_trait]
impl GroupsRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<GiftGroup>, DomainError> {
        self.faults.check()?;
        Ok(self.groups.get(id))
    }

    async fn list_for_member(&self, user_id: Uuid) -> Result<Vec<GiftGroup>, DomainError> {
        self.faults.check()?;
        Ok(self.groups.query(|g| g.is_member(user_id)))
    }

    async fn watch_for_member(
        &self,
        user_id: Uuid,
    ) -> Result<SnapshotStream<GiftGroup>, DomainError> {
        self.faults.check()?;
        debug!(%user_id, "Registering groups live query");
        Ok(self.groups.watch(
            Arc::new(move |g: &GiftGroup| g.is_member(user_id)),
            Arc::clone(&self.faults),
        ))
    }

    async fn create(&self, draft: GroupDraft) -> Result<GiftGroup, DomainError> {
        self.faults.check()?;
        let (id, now) = Self::stamp();
        let group = GiftGroup {
            id,
            name: draft.name,
            year: draft.year,
            owner_id: draft.owner_id,
            member_ids: draft.member_ids,
            overall_budget: draft.overall_budget,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };
        self.groups.insert(id, group.clone());
        Ok(group)
    }

    async fn update(&self, id: Uuid, patch: &GroupPatch) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.groups.modify(
            id,
            || DomainError::not_found(EntityKind::Group, id),
            |g| {
                if let Some(ref name) = patch.name {
                    g.name.clone_from(name);
                }
                if let Some(year) = patch.year {
                    g.year = year;
                }
                if let Some(budget) = patch.overall_budget {
                    g.overall_budget = budget;
                }
                if let Some(active) = patch.is_active {
                    g.is_active = active;
                }
                g.updated_at = now;
            },
        )
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        self.groups.remove(id);
        Ok(())
    }

    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.groups.modify(
            id,
            || DomainError::not_found(EntityKind::Group, id),
            |g| {
                g.member_ids.insert(user_id);
                g.updated_at = now;
            },
        )
    }

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.groups.modify(
            id,
            || DomainError::not_found(EntityKind::Group, id),
            |g| {
                g.member_ids.remove(&user_id);
                g.updated_at = now;
            },
        )
    }
}

#[async_trait]
impl ListsRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<GiftList>, DomainError> {
        self.faults.check()?;
        Ok(self.lists.get(id))
    }

    async fn list_for_group(&self, group_id: Uuid) -> Result<Vec<GiftList>, DomainError> {
        self.faults.check()?;
        Ok(self.lists.query(|l| l.group_id == group_id))
    }

    async fn watch_for_group(
        &self,
        group_id: Uuid,
    ) -> Result<SnapshotStream<GiftList>, DomainError> {
        self.faults.check()?;
        debug!(%group_id, "Registering lists live query");
        Ok(self.lists.watch(
            Arc::new(move |l: &GiftList| l.group_id == group_id),
            Arc::clone(&self.faults),
        ))
    }

    async fn create(&self, draft: ListDraft) -> Result<GiftList, DomainError> {
        self.faults.check()?;
        let (id, now) = Self::stamp();
        let list = GiftList {
            id,
            group_id: draft.group_id,
            recipient_name: draft.recipient_name,
            recipient_id: draft.recipient_id,
            budget: draft.budget,
            created_by: draft.created_by,
            collaborator_ids: draft.collaborator_ids,
            created_at: now,
            updated_at: now,
        };
        self.lists.insert(id, list.clone());
        Ok(list)
    }

    async fn update(&self, id: Uuid, patch: &ListPatch) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.lists.modify(
            id,
            || DomainError::not_found(EntityKind::List, id),
            |l| {
                if let Some(ref name) = patch.recipient_name {
                    l.recipient_name.clone_from(name);
                }
                if let Some(recipient) = patch.recipient_id {
                    l.recipient_id = recipient;
                }
                if let Some(budget) = patch.budget {
                    l.budget = budget;
                }
                l.updated_at = now;
            },
        )
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        self.lists.remove(id);
        Ok(())
    }

    async fn add_collaborator(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.lists.modify(
            id,
            || DomainError::not_found(EntityKind::List, id),
            |l| {
                l.collaborator_ids.insert(user_id);
                l.updated_at = now;
            },
        )
    }

    async fn remove_collaborator(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.lists.modify(
            id,
            || DomainError::not_found(EntityKind::List, id),
            |l| {
                l.collaborator_ids.remove(&user_id);
                l.updated_at = now;
            },
        )
    }
}

#[async_trait]
impl ItemsRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<GiftItem>, DomainError> {
        self.faults.check()?;
        Ok(self.items.get(id))
    }

    async fn list_for_list(&self, list_id: Uuid) -> Result<Vec<GiftItem>, DomainError> {
        self.faults.check()?;
        Ok(self.items.query(|i| i.list_id == list_id))
    }

    async fn watch_for_list(
        &self,
        list_id: Uuid,
    ) -> Result<SnapshotStream<GiftItem>, DomainError> {
        self.faults.check()?;
        debug!(%list_id, "Registering items live query");
        Ok(self.items.watch(
            Arc::new(move |i: &GiftItem| i.list_id == list_id),
            Arc::clone(&self.faults),
        ))
    }

    async fn create(&self, draft: ItemDraft) -> Result<GiftItem, DomainError> {
        self.faults.check()?;
        let (id, now) = Self::stamp();
        let item = GiftItem {
            id,
            list_id: draft.list_id,
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            links: draft.links,
            estimated_price: draft.estimated_price,
            purchase: None,
            notes: draft.notes,
            priority: draft.priority,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        };
        self.items.insert(id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: &ItemPatch) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.items.modify(
            id,
            || DomainError::not_found(EntityKind::Item, id),
            |i| {
                if let Some(ref title) = patch.title {
                    i.title.clone_from(title);
                }
                if let Some(ref description) = patch.description {
                    i.description.clone_from(description);
                }
                if let Some(ref image_url) = patch.image_url {
                    i.image_url.clone_from(image_url);
                }
                if let Some(ref links) = patch.links {
                    i.links.clone_from(links);
                }
                if let Some(price) = patch.estimated_price {
                    i.estimated_price = price;
                }
                if let Some(ref notes) = patch.notes {
                    i.notes.clone_from(notes);
                }
                if let Some(priority) = patch.priority {
                    i.priority = priority;
                }
                i.updated_at = now;
            },
        )
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        self.items.remove(id);
        Ok(())
    }

    async fn mark_purchased(&self, id: Uuid, purchased_by: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.items.modify(
            id,
            || DomainError::not_found(EntityKind::Item, id),
            |i| {
                i.purchase = Some(Purchase {
                    purchased_by,
                    purchase_date: now,
                });
                i.updated_at = now;
            },
        )
    }

    async fn mark_unpurchased(&self, id: Uuid) -> Result<(), DomainError> {
        self.faults.check()?;
        let now = OffsetDateTime::now_utc();
        self.items.modify(
            id,
            || DomainError::not_found(EntityKind::Item, id),
            |i| {
                i.purchase = None;
                i.updated_at = now;
            },
        )
    }
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.faults.check()?;
        Ok(self.users.get(id))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        self.faults.check()?;
        let user = User {
            id: new_user.id,
            email: new_user.email,
            display_name: new_user.display_name,
            photo_url: new_user.photo_url,
            created_at: OffsetDateTime::now_utc(),
            preferences: new_user.preferences,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), DomainError> {
        self.faults.check()?;
        self.users.modify(
            id,
            || DomainError::not_found(EntityKind::User, id),
            |u| {
                if let Some(ref name) = patch.display_name {
                    u.display_name.clone_from(name);
                }
                if let Some(ref photo) = patch.photo_url {
                    u.photo_url.clone_from(photo);
                }
                if let Some(preferences) = patch.preferences {
                    u.preferences = preferences;
                }
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use rust_decimal::Decimal;
    use std::collections::BTreeSet;

    fn draft(owner: Uuid, year: i32) -> GroupDraft {
        GroupDraft {
            name: format!("Family {year}"),
            year,
            owner_id: owner,
            member_ids: BTreeSet::from([owner]),
            overall_budget: Decimal::from(100),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn groups_are_ordered_by_year_descending() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for year in [2026, 2028, 2027] {
            GroupsRepository::create(&store, draft(owner, year))
                .await
                .unwrap();
        }
        GroupsRepository::create(&store, draft(Uuid::new_v4(), 2030))
            .await
            .unwrap();

        let years: Vec<i32> = store
            .list_for_member(owner)
            .await
            .unwrap()
            .iter()
            .map(|g| g.year)
            .collect();
        assert_eq!(years, vec![2028, 2027, 2026]);
    }

    #[tokio::test]
    async fn live_query_pushes_full_snapshots_and_unregisters_on_drop() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let mut stream = store.watch_for_member(owner).await.unwrap();
        assert_eq!(store.listener_count(), 1);

        assert!(stream.next().await.unwrap().unwrap().is_empty());

        let g = GroupsRepository::create(&store, draft(owner, 2026))
            .await
            .unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), vec![g.clone()]);

        GroupsRepository::delete(&store, g.id).await.unwrap();
        assert!(stream.next().await.unwrap().unwrap().is_empty());

        drop(stream);
        assert_eq!(store.listener_count(), 0);
    }

    #[tokio::test]
    async fn rejected_subscription_yields_one_error_then_ends() {
        let store = MemoryStore::new();
        let mut stream = store.watch_for_list(Uuid::new_v4()).await.unwrap();
        assert!(stream.next().await.unwrap().is_ok());

        store.reject_subscriptions(true);
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, DomainError::Remote { .. }));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn unavailable_store_fails_writes() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = GroupsRepository::create(&store, draft(Uuid::new_v4(), 2026))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::remote("data service unavailable"));
    }

    #[tokio::test]
    async fn patching_a_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let err = ItemsRepository::mark_purchased(&store, id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found(EntityKind::Item, id));
    }
}
