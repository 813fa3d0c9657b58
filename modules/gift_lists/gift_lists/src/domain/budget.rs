//! Budget aggregation over lists and items already in hand.
//!
//! Pure: no I/O, no clock. A zero budget yields a zero percentage.

use gift_lists_sdk::{
    BudgetAlert, BudgetStatus, GiftGroup, GiftItem, GiftList, GroupBudget, ListBudget, Priority,
    PrioritySpending,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Percentage thresholds used to classify spending. Anything above 100% is
/// over budget regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BudgetPolicy {
    pub caution_percent: Decimal,
    pub warning_percent: Decimal,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            caution_percent: Decimal::from(50),
            warning_percent: Decimal::from(80),
        }
    }
}

impl BudgetPolicy {
    #[must_use]
    pub fn classify(&self, percentage: Decimal) -> BudgetStatus {
        if percentage > HUNDRED {
            BudgetStatus::OverBudget
        } else if percentage > self.warning_percent {
            BudgetStatus::Warning
        } else if percentage > self.caution_percent {
            BudgetStatus::Caution
        } else {
            BudgetStatus::Healthy
        }
    }
}

/// `100 * spent / budget`, zero when the budget is not positive.
///
/// Saturates at `Decimal::MAX` when the ratio is not representable.
#[must_use]
pub fn percentage(spent: Decimal, budget: Decimal) -> Decimal {
    if budget <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    spent
        .checked_mul(HUNDRED)
        .and_then(|scaled| scaled.checked_div(budget))
        .or_else(|| {
            spent
                .checked_div(budget)
                .and_then(|ratio| ratio.checked_mul(HUNDRED))
        })
        .unwrap_or(Decimal::MAX)
}

/// Sum that saturates instead of overflowing.
fn total(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

#[derive(Default)]
struct Totals {
    spent: Decimal,
    planned: Decimal,
    count: usize,
    purchased: usize,
}

impl Totals {
    fn of<'a>(items: impl IntoIterator<Item = &'a GiftItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut t, item| {
            t.planned = t.planned.saturating_add(item.estimated_price);
            t.count += 1;
            if item.is_purchased() {
                t.spent = t.spent.saturating_add(item.estimated_price);
                t.purchased += 1;
            }
            t
        })
    }
}

/// Budget figures for one list. Items belonging to other lists are ignored.
#[must_use]
pub fn summarize_list(list: &GiftList, items: &[GiftItem], policy: &BudgetPolicy) -> ListBudget {
    let totals = Totals::of(items.iter().filter(|i| i.list_id == list.id));
    let pct = percentage(totals.spent, list.budget);
    ListBudget {
        list_id: list.id,
        recipient_name: list.recipient_name.clone(),
        budget: list.budget,
        spent: totals.spent,
        planned: totals.planned,
        remaining: list.budget.saturating_sub(totals.spent),
        percentage: pct,
        item_count: totals.count,
        purchased_count: totals.purchased,
        status: policy.classify(pct),
    }
}

/// Budget figures for a group: each of its lists, plus totals measured
/// against the group's overall budget. Lists of other groups are ignored.
#[must_use]
pub fn summarize_group(
    group: &GiftGroup,
    lists: &[GiftList],
    items: &[GiftItem],
    policy: &BudgetPolicy,
) -> GroupBudget {
    let per_list: Vec<ListBudget> = lists
        .iter()
        .filter(|l| l.group_id == group.id)
        .map(|l| summarize_list(l, items, policy))
        .collect();

    let spent = total(per_list.iter().map(|l| l.spent));
    let planned = total(per_list.iter().map(|l| l.planned));
    let pct = percentage(spent, group.overall_budget);

    GroupBudget {
        group_id: group.id,
        group_name: group.name.clone(),
        overall_budget: group.overall_budget,
        spent,
        planned,
        remaining: group.overall_budget.saturating_sub(spent),
        percentage: pct,
        status: policy.classify(pct),
        lists: per_list,
    }
}

/// Spent and planned totals per priority, highest priority first.
#[must_use]
pub fn priority_breakdown(items: &[GiftItem]) -> Vec<PrioritySpending> {
    Priority::ALL
        .iter()
        .map(|&priority| {
            let totals = Totals::of(items.iter().filter(|i| i.priority == priority));
            PrioritySpending {
                priority,
                spent: totals.spent,
                planned: totals.planned,
                count: totals.count,
            }
        })
        .collect()
}

/// Alerts for the group and for every list classified `Warning` or worse.
#[must_use]
pub fn alerts(report: &GroupBudget) -> Vec<BudgetAlert> {
    let mut out = Vec::new();
    match report.status {
        BudgetStatus::OverBudget => out.push(BudgetAlert::GroupOverBudget {
            percentage: report.percentage,
            over_by: report.spent.saturating_sub(report.overall_budget),
        }),
        BudgetStatus::Warning => out.push(BudgetAlert::GroupWarning {
            percentage: report.percentage,
        }),
        BudgetStatus::Healthy | BudgetStatus::Caution => {}
    }
    for list in &report.lists {
        match list.status {
            BudgetStatus::OverBudget => out.push(BudgetAlert::ListOverBudget {
                list_id: list.list_id,
                recipient_name: list.recipient_name.clone(),
                percentage: list.percentage,
                over_by: list.spent.saturating_sub(list.budget),
            }),
            BudgetStatus::Warning => out.push(BudgetAlert::ListWarning {
                list_id: list.list_id,
                recipient_name: list.recipient_name.clone(),
                percentage: list.percentage,
            }),
            BudgetStatus::Healthy | BudgetStatus::Caution => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gift_lists_sdk::Purchase;
    use std::collections::BTreeSet;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn group(budget: i64) -> GiftGroup {
        let owner = Uuid::new_v4();
        GiftGroup {
            id: Uuid::new_v4(),
            name: "Family".to_owned(),
            year: 2026,
            owner_id: owner,
            member_ids: BTreeSet::from([owner]),
            overall_budget: Decimal::from(budget),
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn list(group: &GiftGroup, budget: i64) -> GiftList {
        GiftList {
            id: Uuid::new_v4(),
            group_id: group.id,
            recipient_name: "Mum".to_owned(),
            recipient_id: None,
            budget: Decimal::from(budget),
            created_by: group.owner_id,
            collaborator_ids: BTreeSet::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn item(list: &GiftList, price: i64, purchased: bool, priority: Priority) -> GiftItem {
        GiftItem {
            id: Uuid::new_v4(),
            list_id: list.id,
            title: "Gift".to_owned(),
            description: String::new(),
            image_url: None,
            links: vec![],
            estimated_price: Decimal::from(price),
            purchase: purchased.then(|| Purchase {
                purchased_by: list.created_by,
                purchase_date: OffsetDateTime::UNIX_EPOCH,
            }),
            notes: String::new(),
            priority,
            created_by: list.created_by,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn list_figures_follow_purchased_items() {
        let g = group(1000);
        let l = list(&g, 200);
        let items = vec![
            item(&l, 50, true, Priority::High),
            item(&l, 30, false, Priority::Low),
        ];

        let b = summarize_list(&l, &items, &BudgetPolicy::default());
        assert_eq!(b.spent, Decimal::from(50));
        assert_eq!(b.planned, Decimal::from(80));
        assert_eq!(b.remaining, Decimal::from(150));
        assert_eq!(b.percentage, Decimal::from(25));
        assert_eq!(b.item_count, 2);
        assert_eq!(b.purchased_count, 1);
        assert_eq!(b.status, BudgetStatus::Healthy);
    }

    #[test]
    fn zero_budget_has_zero_percentage() {
        let g = group(0);
        let l = list(&g, 0);
        let items = vec![item(&l, 10, true, Priority::Medium)];

        let b = summarize_list(&l, &items, &BudgetPolicy::default());
        assert_eq!(b.percentage, Decimal::ZERO);
        assert_eq!(b.remaining, Decimal::from(-10));
        assert_eq!(b.status, BudgetStatus::Healthy);

        let gb = summarize_group(&g, &[l], &items, &BudgetPolicy::default());
        assert_eq!(gb.percentage, Decimal::ZERO);
    }

    #[test]
    fn extreme_amounts_saturate() {
        let g = group(1);
        let mut l = list(&g, 0);
        l.budget = Decimal::new(1, 10);
        let mut big = item(&l, 0, true, Priority::High);
        big.estimated_price = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let mut huge = item(&l, 0, true, Priority::High);
        huge.estimated_price = Decimal::MAX;
        let items = vec![big, huge];

        let b = summarize_list(&l, &items, &BudgetPolicy::default());
        assert_eq!(b.spent, Decimal::MAX);
        assert_eq!(b.planned, Decimal::MAX);
        assert_eq!(b.percentage, Decimal::MAX);
        assert_eq!(b.status, BudgetStatus::OverBudget);
        assert_eq!(b.remaining, l.budget.saturating_sub(Decimal::MAX));

        let mut other = list(&g, 0);
        other.budget = Decimal::MAX;
        let mut more = item(&other, 0, true, Priority::Low);
        more.estimated_price = Decimal::MAX;
        let mut all = items.clone();
        all.push(more);

        let report = summarize_group(&g, &[l, other], &all, &BudgetPolicy::default());
        assert_eq!(report.spent, Decimal::MAX);
        assert_eq!(report.status, BudgetStatus::OverBudget);
        assert!(matches!(
            alerts(&report).first(),
            Some(BudgetAlert::GroupOverBudget { over_by, .. }) if *over_by == Decimal::MAX - Decimal::ONE
        ));
        assert_eq!(priority_breakdown(&all)[0].spent, Decimal::MAX);
    }

    #[test]
    fn group_aggregates_every_list() {
        let g = group(1000);
        let a = list(&g, 200);
        let b = list(&g, 100);
        let foreign = list(&group(5), 5);
        let items = vec![
            item(&a, 50, true, Priority::High),
            item(&a, 30, false, Priority::High),
            item(&b, 95, true, Priority::Low),
            item(&foreign, 999, true, Priority::Low),
        ];

        let report = summarize_group(
            &g,
            &[a.clone(), b.clone(), foreign],
            &items,
            &BudgetPolicy::default(),
        );
        assert_eq!(report.lists.len(), 2);
        let sum_of_lists: Decimal = report.lists.iter().map(|l| l.spent).sum();
        assert_eq!(report.spent, sum_of_lists);
        assert_eq!(report.spent, Decimal::from(145));
        assert_eq!(report.planned, Decimal::from(175));
        assert_eq!(report.remaining, Decimal::from(855));
        assert_eq!(report.lists[1].status, BudgetStatus::Warning);

        let alerts = alerts(&report);
        assert_eq!(
            alerts,
            vec![BudgetAlert::ListWarning {
                list_id: b.id,
                recipient_name: b.recipient_name.clone(),
                percentage: Decimal::from(95),
            }]
        );
    }

    #[test]
    fn classification_bands() {
        let p = BudgetPolicy::default();
        assert_eq!(p.classify(Decimal::from(50)), BudgetStatus::Healthy);
        assert_eq!(p.classify(Decimal::from(51)), BudgetStatus::Caution);
        assert_eq!(p.classify(Decimal::from(80)), BudgetStatus::Caution);
        assert_eq!(p.classify(Decimal::new(8001, 2)), BudgetStatus::Warning);
        assert_eq!(p.classify(Decimal::from(100)), BudgetStatus::Warning);
        assert_eq!(p.classify(Decimal::new(10001, 2)), BudgetStatus::OverBudget);
    }

    #[test]
    fn over_budget_alerts_carry_overage() {
        let g = group(100);
        let l = list(&g, 40);
        let items = vec![item(&l, 120, true, Priority::High)];

        let report = summarize_group(&g, &[l.clone()], &items, &BudgetPolicy::default());
        assert_eq!(
            alerts(&report),
            vec![
                BudgetAlert::GroupOverBudget {
                    percentage: Decimal::from(120),
                    over_by: Decimal::from(20),
                },
                BudgetAlert::ListOverBudget {
                    list_id: l.id,
                    recipient_name: l.recipient_name.clone(),
                    percentage: Decimal::from(300),
                    over_by: Decimal::from(80),
                },
            ]
        );
    }

    #[test]
    fn priority_breakdown_is_highest_first() {
        let g = group(100);
        let l = list(&g, 100);
        let items = vec![
            item(&l, 10, true, Priority::Low),
            item(&l, 20, false, Priority::High),
            item(&l, 5, true, Priority::High),
        ];

        let rows = priority_breakdown(&items);
        assert_eq!(
            rows.iter().map(|r| r.priority).collect::<Vec<_>>(),
            Priority::ALL.to_vec()
        );
        assert_eq!(rows[0].spent, Decimal::from(5));
        assert_eq!(rows[0].planned, Decimal::from(25));
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].count, 0);
        assert_eq!(rows[2].spent, Decimal::from(10));
    }
}
