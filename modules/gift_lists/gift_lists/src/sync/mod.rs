//! Live view-state synchronizer.
//!
//! Three cascading scopes, each an explicit state machine:
//!
//! | scope | key             | slice    |
//! |-------|-----------------|----------|
//! | user  | signed-in user  | `groups` |
//! | group | selected group  | `lists`  |
//! | list  | selected list   | `items`  |
//!
//! Setting a key subscribes, clearing it unsubscribes and empties the slice.
//! Changing the group clears the list selection first. Each push replaces
//! the whole slice. A failed subscription is not retried until its key is
//! set again.
//!
//! Selection changes take effect synchronously and must be made from within
//! a Tokio runtime, since each subscription runs as a spawned task.

use std::sync::Arc;

use futures::FutureExt;
use gift_lists_sdk::{GiftGroup, GiftItem, GiftList, User};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{GroupsRepository, ItemsRepository, ListsRepository, Repositories};

mod identity;
mod scope;
mod view;

pub use identity::follow_identity;
pub use view::{ScopeStatus, ScopeView, ViewState};

use scope::{ScopeKind, Scopes, Shared};

pub struct Synchronizer {
    groups: Arc<dyn GroupsRepository>,
    lists: Arc<dyn ListsRepository>,
    items: Arc<dyn ItemsRepository>,
    shared: Arc<Shared>,
}

impl Synchronizer {
    #[must_use]
    pub fn new(repos: &Repositories) -> Self {
        Self {
            groups: Arc::clone(&repos.groups),
            lists: Arc::clone(&repos.lists),
            items: Arc::clone(&repos.items),
            shared: Arc::new(Shared::new()),
        }
    }

    /// Receiver that observes every view change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.view.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.shared.view.borrow().clone()
    }

    /// Signs a user in or out of the view.
    ///
    /// The same user again refreshes the profile record, and resubscribes
    /// the user scope if its live query had failed. A different user or
    /// `None` tears down every scope and resets the view.
    pub fn set_user(&self, user: Option<User>) {
        let mut scopes = self.shared.scopes.lock();
        let (current, groups_failed) = {
            let view = self.shared.view.borrow();
            (
                view.user.as_ref().map(|u| u.id),
                view.groups.error().is_some(),
            )
        };

        if let Some(ref u) = user
            && current == Some(u.id)
        {
            let user_id = u.id;
            if !groups_failed {
                self.shared.view.send_modify(|v| v.user = user);
                return;
            }
            scope::teardown(&mut scopes, ScopeKind::User);
            self.shared.view.send_modify(|v| {
                v.user = user;
                v.groups = ScopeView::loading();
            });
            self.start_user_scope(&mut scopes, user_id);
            info!(%user_id, "User scope resubscribed after failure");
            return;
        }

        for kind in [ScopeKind::List, ScopeKind::Group, ScopeKind::User] {
            scope::teardown(&mut scopes, kind);
        }

        let Some(user) = user else {
            self.shared.view.send_replace(ViewState::default());
            info!("View reset after sign-out");
            return;
        };

        let user_id = user.id;
        self.shared.view.send_replace(ViewState {
            user: Some(user),
            groups: ScopeView::loading(),
            ..ViewState::default()
        });
        self.start_user_scope(&mut scopes, user_id);
        info!(%user_id, "User scope subscribed");
    }

    fn start_user_scope(&self, scopes: &mut Scopes, user_id: Uuid) {
        let repo = Arc::clone(&self.groups);
        scope::start::<GiftGroup>(
            &self.shared,
            scopes,
            async move { repo.watch_for_member(user_id).await }.boxed(),
        );
    }

    /// Selects a group, or clears the selection with `None`.
    ///
    /// Any selected list is cleared and its item subscription torn down
    /// before the lists of the new group are subscribed. Selecting the
    /// already-selected group only refreshes the record, unless its lists
    /// subscription had failed, in which case the group scope restarts.
    ///
    /// # Errors
    /// `Validation` when nobody is signed in, `Forbidden` when the user is
    /// not a member of the group.
    pub fn select_group(&self, group: Option<GiftGroup>) -> Result<(), DomainError> {
        let mut scopes = self.shared.scopes.lock();
        let (user_id, current, lists_failed) = {
            let view = self.shared.view.borrow();
            (
                view.user.as_ref().map(|u| u.id),
                view.current_group.as_ref().map(|g| g.id),
                view.lists.error().is_some(),
            )
        };

        if let Some(ref g) = group {
            let user_id =
                user_id.ok_or_else(|| DomainError::validation("group", "no user signed in"))?;
            if !g.is_member(user_id) {
                return Err(DomainError::forbidden(format!(
                    "not a member of group {}",
                    g.id
                )));
            }
            if current == Some(g.id) && !lists_failed {
                self.shared.view.send_modify(|v| v.current_group = group);
                return Ok(());
            }
        }

        scope::teardown(&mut scopes, ScopeKind::List);
        scope::teardown(&mut scopes, ScopeKind::Group);

        let group_id = group.as_ref().map(|g| g.id);
        self.shared.view.send_modify(|v| {
            v.current_list = None;
            v.items = ScopeView::default();
            v.current_group = group;
            v.lists = if group_id.is_some() {
                ScopeView::loading()
            } else {
                ScopeView::default()
            };
        });

        match group_id {
            Some(group_id) => {
                let repo = Arc::clone(&self.lists);
                scope::start::<GiftList>(
                    &self.shared,
                    &mut scopes,
                    async move { repo.watch_for_group(group_id).await }.boxed(),
                );
                debug!(%group_id, "Group scope subscribed");
            }
            None => debug!("Group selection cleared"),
        }
        Ok(())
    }

    /// Selects a list of the current group, or clears the selection.
    ///
    /// # Errors
    /// `Validation` when no group is selected or the list belongs to a
    /// different group.
    pub fn select_list(&self, list: Option<GiftList>) -> Result<(), DomainError> {
        let mut scopes = self.shared.scopes.lock();
        let (group_id, current, items_failed) = {
            let view = self.shared.view.borrow();
            (
                view.current_group.as_ref().map(|g| g.id),
                view.current_list.as_ref().map(|l| l.id),
                view.items.error().is_some(),
            )
        };

        if let Some(ref l) = list {
            if group_id != Some(l.group_id) {
                return Err(DomainError::validation(
                    "list",
                    "list does not belong to the selected group",
                ));
            }
            if current == Some(l.id) && !items_failed {
                self.shared.view.send_modify(|v| v.current_list = list);
                return Ok(());
            }
        }

        scope::teardown(&mut scopes, ScopeKind::List);

        let list_id = list.as_ref().map(|l| l.id);
        self.shared.view.send_modify(|v| {
            v.current_list = list;
            v.items = if list_id.is_some() {
                ScopeView::loading()
            } else {
                ScopeView::default()
            };
        });

        match list_id {
            Some(list_id) => {
                let repo = Arc::clone(&self.items);
                scope::start::<GiftItem>(
                    &self.shared,
                    &mut scopes,
                    async move { repo.watch_for_list(list_id).await }.boxed(),
                );
                debug!(%list_id, "List scope subscribed");
            }
            None => debug!("List selection cleared"),
        }
        Ok(())
    }

    /// Tears down every scope and resets the view.
    pub fn shutdown(&self) {
        self.set_user(None);
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        let mut scopes = self.shared.scopes.lock();
        scope::abort_all(&mut scopes);
    }
}

#[cfg(test)]
mod tests;
