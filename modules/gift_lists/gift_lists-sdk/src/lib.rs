//! Gift Lists SDK
//!
//! This crate provides the public API for the `gift_lists` module:
//! - `GiftListsClient` trait
//! - Model types for users, groups, lists and items
//! - Budget report types
//! - Error type (`GiftListsError`)
//!
//! ## Usage
//!
//! ```ignore
//! use gift_lists_sdk::{Actor, GiftListsClient};
//!
//! let client: Arc<dyn GiftListsClient> = module.client();
//! let groups = client.list_groups(Actor::new(user_id)).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod budget;
pub mod client;
pub mod errors;
pub mod models;

pub use budget::{BudgetAlert, BudgetStatus, GroupBudget, ListBudget, PrioritySpending};
pub use client::GiftListsClient;
pub use errors::{EntityKind, GiftListsError};
pub use models::{
    Actor, GiftGroup, GiftItem, GiftList, GroupPatch, ItemLink, ItemPatch, ListPatch, NewGroup,
    NewItem, NewList, NewUser, Preferences, Priority, Purchase, Theme, User, UserPatch,
};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn item_serializes_camel_case_with_nested_purchase() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let buyer = Uuid::nil();
        let item = GiftItem {
            id: Uuid::nil(),
            list_id: Uuid::nil(),
            title: "Scarf".to_owned(),
            description: String::new(),
            image_url: None,
            links: vec![],
            estimated_price: Decimal::new(2550, 2),
            purchase: Some(Purchase {
                purchased_by: buyer,
                purchase_date: now,
            }),
            notes: String::new(),
            priority: Priority::High,
            created_by: Uuid::nil(),
            created_at: now,
            updated_at: now,
        };

        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["estimatedPrice"], "25.50");
        assert_eq!(v["priority"], "high");
        assert_eq!(v["purchase"]["purchaseDate"], "1970-01-01T00:00:00Z");
        assert!(v.get("listId").is_some());
    }

    #[test]
    fn group_tolerates_missing_optional_fields() {
        let raw = serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Family",
            "year": 2026,
            "ownerId": "00000000-0000-0000-0000-000000000002",
            "memberIds": ["00000000-0000-0000-0000-000000000002"],
            "overallBudget": "1000",
            "isActive": true,
            "createdAt": "2026-11-01T10:00:00Z",
            "updatedAt": "2026-11-01T10:00:00Z"
        });
        let group: GiftGroup = serde_json::from_value(raw).unwrap();
        assert!(group.is_member(group.owner_id));
        assert_eq!(group.overall_budget, Decimal::from(1000));
    }

    #[test]
    fn priority_order_and_defaults() {
        assert!(Priority::High > Priority::Medium);
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Preferences::default().theme, Theme::Light);
        assert!(Preferences::default().notifications);
    }

    #[test]
    fn not_found_message_names_entity() {
        let id = Uuid::nil();
        let err = GiftListsError::not_found(EntityKind::List, id);
        assert_eq!(err.to_string(), format!("list not found: {id}"));
    }
}
