//! Budget report over an exported data snapshot.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gift_lists::domain::budget::{self, BudgetPolicy};
use gift_lists_sdk::{
    BudgetAlert, GiftGroup, GiftItem, GiftList, GroupBudget, PrioritySpending,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exported records, in their wire shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Snapshot {
    pub groups: Vec<GiftGroup>,
    pub lists: Vec<GiftList>,
    pub items: Vec<GiftItem>,
}

impl Snapshot {
    /// # Errors
    /// Fails when the file cannot be read or is not a snapshot document.
    pub fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid snapshot {}", path.display()))?;
        snapshot
            .check()
            .with_context(|| format!("invalid snapshot {}", path.display()))?;
        Ok(snapshot)
    }

    /// Record invariants the data service guarantees for live data.
    ///
    /// # Errors
    /// Names the first record that breaks one.
    pub fn check(&self) -> Result<()> {
        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group.is_member(group.owner_id) {
                bail!("group {}: owner is not a member", group.id);
            }
            if group.overall_budget.is_sign_negative() && !group.overall_budget.is_zero() {
                bail!("group {}: negative overall budget", group.id);
            }
            group_ids.insert(group.id);
        }

        let mut list_ids = HashSet::new();
        for list in &self.lists {
            if !group_ids.contains(&list.group_id) {
                bail!("list {}: unknown group {}", list.id, list.group_id);
            }
            if list.budget.is_sign_negative() && !list.budget.is_zero() {
                bail!("list {}: negative budget", list.id);
            }
            list_ids.insert(list.id);
        }

        for item in &self.items {
            if !list_ids.contains(&item.list_id) {
                bail!("item {}: unknown list {}", item.id, item.list_id);
            }
            if item.estimated_price.is_sign_negative() && !item.estimated_price.is_zero() {
                bail!("item {}: negative estimated price", item.id);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub budget: GroupBudget,
    pub alerts: Vec<BudgetAlert>,
    pub priorities: Vec<PrioritySpending>,
}

/// One report per group, or only `only` when given.
///
/// # Errors
/// Fails when `only` names a group absent from the snapshot.
pub fn build(
    snapshot: &Snapshot,
    policy: &BudgetPolicy,
    only: Option<Uuid>,
) -> Result<Vec<GroupReport>> {
    let groups: Vec<&GiftGroup> = match only {
        Some(id) => {
            let Some(group) = snapshot.groups.iter().find(|g| g.id == id) else {
                bail!("group {id} not found in snapshot");
            };
            vec![group]
        }
        None => snapshot.groups.iter().collect(),
    };

    let reports = groups
        .into_iter()
        .map(|group| {
            let report = budget::summarize_group(group, &snapshot.lists, &snapshot.items, policy);
            let list_ids: HashSet<Uuid> = report.lists.iter().map(|l| l.list_id).collect();
            let items: Vec<GiftItem> = snapshot
                .items
                .iter()
                .filter(|i| list_ids.contains(&i.list_id))
                .cloned()
                .collect();
            tracing::debug!(group_id = %group.id, lists = list_ids.len(), "Summarized group");
            GroupReport {
                alerts: budget::alerts(&report),
                priorities: budget::priority_breakdown(&items),
                budget: report,
            }
        })
        .collect();
    Ok(reports)
}
