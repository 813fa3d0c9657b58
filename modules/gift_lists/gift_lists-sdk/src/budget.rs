//! Budget report types.
//!
//! Computed by the module from lists and items already in hand; none of these
//! values are stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Priority;

/// Display classification of a percentage-used figure. Never enforced on writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Healthy,
    Caution,
    Warning,
    OverBudget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBudget {
    pub list_id: Uuid,
    pub recipient_name: String,
    pub budget: Decimal,
    /// Sum of estimated prices of purchased items.
    pub spent: Decimal,
    /// Sum of estimated prices of all items.
    pub planned: Decimal,
    /// `budget - spent`; negative when over budget.
    pub remaining: Decimal,
    /// `100 * spent / budget`, or zero for a zero budget.
    pub percentage: Decimal,
    pub item_count: usize,
    pub purchased_count: usize,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBudget {
    pub group_id: Uuid,
    pub group_name: String,
    pub overall_budget: Decimal,
    pub spent: Decimal,
    pub planned: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub status: BudgetStatus,
    pub lists: Vec<ListBudget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritySpending {
    pub priority: Priority,
    pub spent: Decimal,
    pub planned: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetAlert {
    GroupWarning {
        percentage: Decimal,
    },
    GroupOverBudget {
        percentage: Decimal,
        over_by: Decimal,
    },
    ListWarning {
        list_id: Uuid,
        recipient_name: String,
        percentage: Decimal,
    },
    ListOverBudget {
        list_id: Uuid,
        recipient_name: String,
        percentage: Decimal,
        over_by: Decimal,
    },
}
