use gift_lists_sdk::{GiftGroup, GiftItem, GiftList, ListBudget, PrioritySpending, User};

use crate::domain::budget::{self, BudgetPolicy};

/// Lifecycle of one live-query scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScopeStatus {
    /// No key, no listener.
    #[default]
    Unsubscribed,
    /// Listener registered, first snapshot not yet delivered.
    Loading,
    Live,
    /// The live query failed. Retried only when the key is set again.
    Failed(String),
}

/// A collection slice of the view together with its scope status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeView<T> {
    pub status: ScopeStatus,
    pub records: Vec<T>,
}

impl<T> Default for ScopeView<T> {
    fn default() -> Self {
        Self {
            status: ScopeStatus::Unsubscribed,
            records: Vec::new(),
        }
    }
}

impl<T> ScopeView<T> {
    pub(super) fn loading() -> Self {
        Self {
            status: ScopeStatus::Loading,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self.status {
            ScopeStatus::Failed(ref message) => Some(message),
            _ => None,
        }
    }
}

/// Read-only materialized view of what the signed-in user is looking at.
///
/// `groups` follows the user, `lists` follows `current_group`, `items`
/// follows `current_list`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub user: Option<User>,
    pub current_group: Option<GiftGroup>,
    pub current_list: Option<GiftList>,
    pub groups: ScopeView<GiftGroup>,
    pub lists: ScopeView<GiftList>,
    pub items: ScopeView<GiftItem>,
}

impl ViewState {
    pub fn active_groups(&self) -> impl Iterator<Item = &GiftGroup> {
        self.groups.records.iter().filter(|g| g.is_active)
    }

    /// Budget of the selected list over the items currently in view.
    #[must_use]
    pub fn current_list_budget(&self, policy: &BudgetPolicy) -> Option<ListBudget> {
        self.current_list
            .as_ref()
            .map(|list| budget::summarize_list(list, &self.items.records, policy))
    }

    #[must_use]
    pub fn current_priority_breakdown(&self) -> Vec<PrioritySpending> {
        budget::priority_breakdown(&self.items.records)
    }
}
