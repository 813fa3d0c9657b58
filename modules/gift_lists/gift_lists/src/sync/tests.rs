#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use gift_lists_sdk::{
    Actor, BudgetStatus, GiftGroup, GiftItem, GiftList, GroupPatch, NewGroup, NewItem, NewList,
    Preferences, Priority, User,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{ScopeStatus, Synchronizer, ViewState};
use crate::config::GiftListsConfig;
use crate::domain::budget::BudgetPolicy;
use crate::domain::error::DomainError;
use crate::domain::ports::AuthProvider;
use crate::domain::service::AppServices;
use crate::infra::memory::{MemoryAuthProvider, MemoryStore};
use crate::module::GiftLists;

const WAIT: Duration = Duration::from_secs(2);

async fn wait_for(
    rx: &mut watch::Receiver<ViewState>,
    pred: impl FnMut(&ViewState) -> bool,
) -> ViewState {
    tokio::time::timeout(WAIT, rx.wait_for(pred))
        .await
        .expect("view did not reach the expected state")
        .expect("view channel closed")
        .clone()
}

async fn wait_for_listeners(store: &MemoryStore, expected: usize) {
    tokio::time::timeout(WAIT, async {
        while store.listener_count() != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("listener count did not settle");
}

fn user(id: Uuid) -> User {
    User {
        id,
        email: "ada@example.com".to_owned(),
        display_name: "Ada".to_owned(),
        photo_url: None,
        created_at: OffsetDateTime::now_utc(),
        preferences: Preferences::default(),
    }
}

struct Fixture {
    services: Arc<AppServices>,
    store: Arc<MemoryStore>,
    sync: Arc<Synchronizer>,
    actor: Actor,
}

impl Fixture {
    fn new() -> Self {
        let (module, store) = GiftLists::in_memory(GiftListsConfig::default());
        Self {
            services: module.services(),
            sync: module.synchronizer(),
            store,
            actor: Actor::new(Uuid::new_v4()),
        }
    }

    async fn group(&self, name: &str) -> GiftGroup {
        self.services
            .groups
            .create_group(
                self.actor,
                NewGroup {
                    name: name.to_owned(),
                    year: OffsetDateTime::now_utc().year(),
                    overall_budget: Decimal::from(500),
                    member_ids: BTreeSet::new(),
                },
            )
            .await
            .unwrap()
    }

    async fn list(&self, group: &GiftGroup) -> GiftList {
        self.services
            .lists
            .create_list(
                self.actor,
                NewList {
                    group_id: group.id,
                    recipient_name: "Mum".to_owned(),
                    recipient_id: None,
                    budget: Decimal::from(100),
                    collaborator_ids: BTreeSet::new(),
                },
            )
            .await
            .unwrap()
    }

    async fn item(&self, list: &GiftList, title: &str) -> GiftItem {
        self.services
            .items
            .create_item(
                self.actor,
                NewItem {
                    list_id: list.id,
                    title: title.to_owned(),
                    description: String::new(),
                    image_url: None,
                    links: vec![],
                    estimated_price: Decimal::from(10),
                    notes: String::new(),
                    priority: Priority::Medium,
                },
            )
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn user_scope_follows_memberships() {
    let f = Fixture::new();
    let mut rx = f.sync.subscribe();
    assert_eq!(f.sync.snapshot(), ViewState::default());

    f.sync.set_user(Some(user(f.actor.user_id())));
    let view = wait_for(&mut rx, |v| v.groups.status == ScopeStatus::Live).await;
    assert!(view.groups.records.is_empty());

    let group = f.group("Family").await;
    let view = wait_for(&mut rx, |v| v.groups.records.len() == 1).await;
    assert_eq!(view.groups.records[0].id, group.id);
    assert_eq!(view.active_groups().count(), 1);
    assert_eq!(f.store.listener_count(), 1);
}

#[tokio::test]
async fn selecting_a_new_group_clears_the_list_first() {
    let f = Fixture::new();
    let mut rx = f.sync.subscribe();
    let first = f.group("Family").await;
    let second = f.group("Friends").await;
    let list = f.list(&first).await;
    f.item(&list, "Scarf").await;

    f.sync.set_user(Some(user(f.actor.user_id())));
    f.sync.select_group(Some(first.clone())).unwrap();
    let view = wait_for(&mut rx, |v| v.lists.records.len() == 1).await;
    f.sync.select_list(Some(view.lists.records[0].clone())).unwrap();
    wait_for(&mut rx, |v| v.items.records.len() == 1).await;
    wait_for_listeners(&f.store, 3).await;

    f.sync.select_group(Some(second.clone())).unwrap();
    let view = f.sync.snapshot();
    assert_eq!(view.current_group.as_ref().map(|g| g.id), Some(second.id));
    assert_eq!(view.current_list, None);
    assert_eq!(view.items.status, ScopeStatus::Unsubscribed);
    assert!(view.items.records.is_empty());

    wait_for(&mut rx, |v| v.lists.status == ScopeStatus::Live).await;
    wait_for_listeners(&f.store, 2).await;

    // The old list's items no longer reach the view.
    f.item(&list, "Gloves").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let view = f.sync.snapshot();
    assert!(view.items.records.is_empty());
    assert!(view.lists.records.is_empty());
}

#[tokio::test]
async fn selection_rules() {
    let f = Fixture::new();
    let group = f.group("Family").await;
    let list = f.list(&group).await;

    let err = f.sync.select_group(Some(group.clone())).unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    f.sync.set_user(Some(user(Uuid::new_v4())));
    let err = f.sync.select_group(Some(group.clone())).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    f.sync.set_user(Some(user(f.actor.user_id())));
    let err = f.sync.select_list(Some(list.clone())).unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    f.sync.select_group(Some(group)).unwrap();
    f.sync.select_list(Some(list)).unwrap();
    f.sync.select_list(None).unwrap();
    let view = f.sync.snapshot();
    assert_eq!(view.current_list, None);
    assert_eq!(view.items.status, ScopeStatus::Unsubscribed);
}

#[tokio::test]
async fn selected_group_is_refreshed_from_snapshots() {
    let f = Fixture::new();
    let mut rx = f.sync.subscribe();
    let group = f.group("Family").await;

    f.sync.set_user(Some(user(f.actor.user_id())));
    f.sync.select_group(Some(group.clone())).unwrap();
    wait_for(&mut rx, |v| v.groups.status == ScopeStatus::Live).await;

    f.services
        .groups
        .update_group(
            f.actor,
            group.id,
            GroupPatch {
                name: Some("Family 2".to_owned()),
                ..GroupPatch::default()
            },
        )
        .await
        .unwrap();

    let view = wait_for(&mut rx, |v| {
        v.current_group.as_ref().is_some_and(|g| g.name == "Family 2")
    })
    .await;
    assert_eq!(view.groups.records[0].name, "Family 2");
}

#[tokio::test]
async fn live_list_budget_tracks_purchases() {
    let f = Fixture::new();
    let mut rx = f.sync.subscribe();
    let group = f.group("Family").await;
    let list = f.list(&group).await;
    let scarf = f.item(&list, "Scarf").await;
    f.item(&list, "Gloves").await;
    let policy = BudgetPolicy::default();

    f.sync.set_user(Some(user(f.actor.user_id())));
    assert_eq!(f.sync.snapshot().current_list_budget(&policy), None);
    f.sync.select_group(Some(group)).unwrap();
    f.sync.select_list(Some(list.clone())).unwrap();
    wait_for(&mut rx, |v| v.items.records.len() == 2).await;

    f.services
        .items
        .mark_purchased(f.actor, scarf.id)
        .await
        .unwrap();
    let view = wait_for(&mut rx, |v| v.items.records.iter().any(GiftItem::is_purchased)).await;

    let budget = view.current_list_budget(&policy).unwrap();
    assert_eq!(budget.list_id, list.id);
    assert_eq!(budget.spent, Decimal::from(10));
    assert_eq!(budget.planned, Decimal::from(20));
    assert_eq!(budget.remaining, Decimal::from(90));
    assert_eq!(budget.percentage, Decimal::from(10));
    assert_eq!(budget.purchased_count, 1);
    assert_eq!(budget.status, BudgetStatus::Healthy);

    let medium = view
        .current_priority_breakdown()
        .into_iter()
        .find(|p| p.priority == Priority::Medium)
        .unwrap();
    assert_eq!(
        (medium.spent, medium.planned, medium.count),
        (Decimal::from(10), Decimal::from(20), 2)
    );
}

#[tokio::test]
async fn subscription_failure_is_recorded_and_not_retried() {
    let f = Fixture::new();
    let mut rx = f.sync.subscribe();
    f.sync.set_user(Some(user(f.actor.user_id())));
    wait_for(&mut rx, |v| v.groups.status == ScopeStatus::Live).await;

    f.store.reject_subscriptions(true);
    let view = wait_for(&mut rx, |v| v.groups.error().is_some()).await;
    assert!(view.groups.error().unwrap().contains("permission denied"));
    wait_for_listeners(&f.store, 0).await;

    f.store.reject_subscriptions(false);
    f.group("Family").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(f.sync.snapshot().groups.records.is_empty());
}

#[tokio::test]
async fn reselecting_a_failed_group_restarts_its_scope() {
    let f = Fixture::new();
    let mut rx = f.sync.subscribe();
    let group = f.group("Family").await;
    f.list(&group).await;

    f.sync.set_user(Some(user(f.actor.user_id())));
    f.sync.select_group(Some(group.clone())).unwrap();
    wait_for(&mut rx, |v| v.lists.records.len() == 1).await;

    f.store.reject_subscriptions(true);
    wait_for(&mut rx, |v| v.lists.error().is_some()).await;
    f.store.reject_subscriptions(false);

    f.sync.select_group(Some(group)).unwrap();
    let view = wait_for(&mut rx, |v| v.lists.status == ScopeStatus::Live).await;
    assert_eq!(view.lists.records.len(), 1);
}

#[tokio::test]
async fn sign_out_tears_everything_down() {
    let f = Fixture::new();
    let mut rx = f.sync.subscribe();
    let group = f.group("Family").await;

    f.sync.set_user(Some(user(f.actor.user_id())));
    f.sync.select_group(Some(group)).unwrap();
    wait_for(&mut rx, |v| v.lists.status == ScopeStatus::Live).await;
    wait_for_listeners(&f.store, 2).await;

    f.sync.shutdown();
    assert_eq!(f.sync.snapshot(), ViewState::default());
    wait_for_listeners(&f.store, 0).await;
}

#[tokio::test]
async fn identity_changes_drive_the_user_scope() {
    let auth = MemoryAuthProvider::new();
    let (module, _) = GiftLists::in_memory(GiftListsConfig::default());
    let sync = module.synchronizer();
    let mut rx = sync.subscribe();
    let cancel = CancellationToken::new();
    let bridge = module.follow_identity(Arc::clone(&sync), &auth, cancel.clone());

    let identity = auth
        .register("grace@example.com", "secret1", "Grace")
        .await
        .unwrap();
    let view = wait_for(&mut rx, |v| v.groups.status == ScopeStatus::Live).await;
    let profile = view.user.unwrap();
    assert_eq!(profile.id, identity.uid);
    assert_eq!(profile.display_name, "Grace");

    auth.sign_out().await.unwrap();
    wait_for(&mut rx, |v| v.user.is_none()).await;

    cancel.cancel();
    bridge.await.unwrap();
}

#[tokio::test]
async fn signing_the_same_identity_in_again_resubscribes() {
    let auth = MemoryAuthProvider::new();
    let (module, store) = GiftLists::in_memory(GiftListsConfig::default());
    let sync = module.synchronizer();
    let mut rx = sync.subscribe();
    let cancel = CancellationToken::new();
    let bridge = module.follow_identity(Arc::clone(&sync), &auth, cancel.clone());

    let identity = auth
        .register("grace@example.com", "secret1", "Grace")
        .await
        .unwrap();
    wait_for(&mut rx, |v| v.groups.status == ScopeStatus::Live).await;

    store.reject_subscriptions(true);
    wait_for(&mut rx, |v| v.groups.error().is_some()).await;
    store.reject_subscriptions(false);

    auth.sign_in("grace@example.com", "secret1").await.unwrap();
    wait_for(&mut rx, |v| v.groups.status == ScopeStatus::Live).await;

    let group = module
        .services()
        .groups
        .create_group(
            Actor::new(identity.uid),
            NewGroup {
                name: "Family".to_owned(),
                year: OffsetDateTime::now_utc().year(),
                overall_budget: Decimal::from(100),
                member_ids: BTreeSet::new(),
            },
        )
        .await
        .unwrap();
    let view = wait_for(&mut rx, |v| v.groups.records.len() == 1).await;
    assert_eq!(view.groups.records[0].id, group.id);

    cancel.cancel();
    bridge.await.unwrap();
}
