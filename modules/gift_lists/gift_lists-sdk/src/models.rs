//! Public models for the `gift_lists` module.
//!
//! These are the records stored in the remote document collections
//! (`users`, `groups`, `lists`, `items`). They serialize with camelCase field
//! names, RFC 3339 timestamps and string decimals.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The signed-in user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    user_id: Uuid,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

// ==================== Users ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub notifications: bool,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            theme: Theme::Light,
        }
    }
}

/// A user profile, created on first successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Data for provisioning a user profile. The id is the identity id issued by
/// the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub preferences: Preferences,
}

/// Partial update data for a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    /// `Some(None)` clears the avatar.
    pub photo_url: Option<Option<String>>,
    pub preferences: Option<Preferences>,
}

// ==================== Groups ====================

/// A yearly collection of gift lists shared by a set of members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftGroup {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub owner_id: Uuid,
    pub member_ids: BTreeSet<Uuid>,
    pub overall_budget: Decimal,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl GiftGroup {
    #[must_use]
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.member_ids.contains(&user_id)
    }
}

/// Data for creating a group. The acting user becomes owner and first member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub year: i32,
    pub overall_budget: Decimal,
    /// Members besides the owner.
    pub member_ids: BTreeSet<Uuid>,
}

/// Partial update data for a group. Membership changes go through
/// `add_member` / `remove_member`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub overall_budget: Option<Decimal>,
    pub is_active: Option<bool>,
}

// ==================== Lists ====================

/// A recipient-scoped collection of gift items with its own budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftList {
    pub id: Uuid,
    pub group_id: Uuid,
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
    pub budget: Decimal,
    pub created_by: Uuid,
    #[serde(default)]
    pub collaborator_ids: BTreeSet<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl GiftList {
    /// Creator or collaborator.
    #[must_use]
    pub fn is_editor(&self, user_id: Uuid) -> bool {
        self.created_by == user_id || self.collaborator_ids.contains(&user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    pub group_id: Uuid,
    pub recipient_name: String,
    pub recipient_id: Option<Uuid>,
    pub budget: Decimal,
    pub collaborator_ids: BTreeSet<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPatch {
    pub recipient_name: Option<String>,
    /// `Some(None)` unlinks the recipient user.
    pub recipient_id: Option<Option<Uuid>>,
    pub budget: Option<Decimal>,
}

// ==================== Items ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Highest first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLink {
    pub url: String,
    pub label: String,
}

/// Who bought an item and when. Present exactly when the item is purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub purchased_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub purchase_date: OffsetDateTime,
}

/// A single gift idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub links: Vec<ItemLink>,
    pub estimated_price: Decimal,
    #[serde(default)]
    pub purchase: Option<Purchase>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub priority: Priority,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl GiftItem {
    #[must_use]
    pub fn is_purchased(&self) -> bool {
        self.purchase.is_some()
    }

    #[must_use]
    pub fn purchased_by(&self) -> Option<Uuid> {
        self.purchase.map(|p| p.purchased_by)
    }

    #[must_use]
    pub fn purchase_date(&self) -> Option<OffsetDateTime> {
        self.purchase.map(|p| p.purchase_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub list_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub links: Vec<ItemLink>,
    pub estimated_price: Decimal,
    pub notes: String,
    pub priority: Priority,
}

/// Partial update data for an item. Purchase state is changed only through
/// `mark_purchased` / `mark_unpurchased`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<Option<String>>,
    pub links: Option<Vec<ItemLink>>,
    pub estimated_price: Option<Decimal>,
    pub notes: Option<String>,
    pub priority: Option<Priority>,
}
