#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `gift_lists` integration tests.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::collections::BTreeSet;
use std::sync::Arc;

use gift_lists::config::GiftListsConfig;
use gift_lists::infra::memory::MemoryStore;
use gift_lists::{Actor, GiftLists, GiftListsClient};
use gift_lists_sdk::{GiftGroup, GiftItem, GiftList, NewGroup, NewItem, NewList, Priority};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct Harness {
    pub module: GiftLists,
    pub client: Arc<dyn GiftListsClient>,
    pub store: Arc<MemoryStore>,
}

#[must_use]
pub fn harness() -> Harness {
    let (module, store) = GiftLists::in_memory(GiftListsConfig::default());
    Harness {
        client: module.client(),
        module,
        store,
    }
}

#[must_use]
pub fn actor() -> Actor {
    Actor::new(Uuid::new_v4())
}

pub async fn seed_group(
    client: &dyn GiftListsClient,
    owner: Actor,
    members: &[Actor],
    budget: i64,
) -> GiftGroup {
    client
        .create_group(
            owner,
            NewGroup {
                name: "Family".to_owned(),
                year: OffsetDateTime::now_utc().year(),
                overall_budget: Decimal::from(budget),
                member_ids: members.iter().map(Actor::user_id).collect(),
            },
        )
        .await
        .expect("seed group")
}

pub async fn seed_list(
    client: &dyn GiftListsClient,
    actor: Actor,
    group: &GiftGroup,
    recipient: &str,
    budget: i64,
) -> GiftList {
    client
        .create_list(
            actor,
            NewList {
                group_id: group.id,
                recipient_name: recipient.to_owned(),
                recipient_id: None,
                budget: Decimal::from(budget),
                collaborator_ids: BTreeSet::new(),
            },
        )
        .await
        .expect("seed list")
}

pub async fn seed_item(
    client: &dyn GiftListsClient,
    actor: Actor,
    list: &GiftList,
    title: &str,
    price: i64,
) -> GiftItem {
    client
        .create_item(
            actor,
            NewItem {
                list_id: list.id,
                title: title.to_owned(),
                description: String::new(),
                image_url: None,
                links: vec![],
                estimated_price: Decimal::from(price),
                notes: String::new(),
                priority: Priority::Medium,
            },
        )
        .await
        .expect("seed item")
}
