//! Configuration for the gift lists module.

use serde::{Deserialize, Serialize};

use crate::domain::budget::BudgetPolicy;
use crate::domain::service::ServiceConfig;

/// Configuration for the gift lists module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GiftListsConfig {
    /// Field limits applied before writes.
    pub service: ServiceConfig,
    /// Spending thresholds, in percent of budget.
    pub budget: BudgetPolicy,
}
