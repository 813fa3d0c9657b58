//! Domain service layer - business logic and rules.
//!
//! One service per collection:
//! - `groups` - group CRUD and membership (owner-only writes)
//! - `lists` - per-recipient lists and their collaborators
//! - `items` - gift items and the purchase toggle
//! - `users` - profiles, provisioned on first sign-in
//!
//! Every write is validated and access-checked before it reaches the
//! repository. Each write is a single repository call; nothing here spans
//! several documents atomically.

use std::sync::Arc;

use futures::future::try_join_all;
use gift_lists_sdk::{Actor, GroupBudget};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::budget::{self, BudgetPolicy};
use crate::domain::error::DomainError;
use crate::domain::repos::Repositories;
use crate::domain::validation::Validator;

mod access;
mod groups;
mod items;
mod lists;
mod users;

pub use groups::GroupsService;
pub use items::ItemsService;
pub use lists::ListsService;
pub use users::UsersService;


/// Configuration for the domain services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_text_length: usize,
    pub max_links_per_item: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 100,
            max_text_length: 2000,
            max_links_per_item: 10,
        }
    }
}

impl ServiceConfig {
    fn validator(&self) -> Validator<'_> {
        Validator::new(self, OffsetDateTime::now_utc().year())
    }
}

// DI Container - aggregates all domain services
#[derive(Clone)]
pub struct AppServices {
    pub groups: Arc<GroupsService>,
    pub lists: Arc<ListsService>,
    pub items: Arc<ItemsService>,
    pub users: Arc<UsersService>,
    budget: BudgetPolicy,
}

impl AppServices {
    #[must_use]
    pub fn new(repos: &Repositories, config: ServiceConfig, budget: BudgetPolicy) -> Self {
        let config = Arc::new(config);
        Self {
            groups: Arc::new(GroupsService::new(
                Arc::clone(&repos.groups),
                Arc::clone(&config),
            )),
            lists: Arc::new(ListsService::new(
                Arc::clone(&repos.lists),
                Arc::clone(&repos.groups),
                Arc::clone(&config),
            )),
            items: Arc::new(ItemsService::new(
                Arc::clone(&repos.items),
                Arc::clone(&repos.lists),
                Arc::clone(&repos.groups),
                Arc::clone(&config),
            )),
            users: Arc::new(UsersService::new(Arc::clone(&repos.users), config)),
            budget,
        }
    }

    #[must_use]
    pub fn budget_policy(&self) -> &BudgetPolicy {
        &self.budget
    }

    /// Reads the group, every list in it and every item of those lists, then
    /// aggregates. The reads are not a consistent snapshot.
    #[instrument(skip(self, actor), fields(group_id = %group_id))]
    pub async fn group_budget(
        &self,
        actor: Actor,
        group_id: Uuid,
    ) -> Result<GroupBudget, DomainError> {
        let group = self.groups.get_group(actor, group_id).await?;
        let lists = self.lists.list_lists_for_group(actor, group_id).await?;
        let items = try_join_all(
            lists
                .iter()
                .map(|l| self.items.list_items_for_list(actor, l.id)),
        )
        .await?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        debug!(
            lists = lists.len(),
            items = items.len(),
            "Aggregating group budget"
        );
        Ok(budget::summarize_group(&group, &lists, &items, &self.budget))
    }
}
