//! Remote data service boundary.
//!
//! One repository per document collection. Every write is a single atomic
//! document operation; ids and timestamps are assigned by the service.
//! Live queries deliver the full matching result set on every change.

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;

use crate::domain::error::DomainError;

mod groups_repo;
mod items_repo;
mod lists_repo;
mod users_repo;

pub use groups_repo::{GroupDraft, GroupsRepository};
pub use items_repo::{ItemDraft, ItemsRepository};
pub use lists_repo::{ListDraft, ListsRepository};
pub use users_repo::UsersRepository;

/// Full-snapshot live query. Dropping the stream unregisters the listener.
pub type SnapshotStream<T> =
    Pin<Box<dyn Stream<Item = Result<Vec<T>, DomainError>> + Send + 'static>>;

/// The four collections, as shared trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub groups: Arc<dyn GroupsRepository>,
    pub lists: Arc<dyn ListsRepository>,
    pub items: Arc<dyn ItemsRepository>,
    pub users: Arc<dyn UsersRepository>,
}

impl Repositories {
    /// All four collections served by one store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: GroupsRepository + ListsRepository + ItemsRepository + UsersRepository + 'static,
    {
        Self {
            groups: store.clone(),
            lists: store.clone(),
            items: store.clone(),
            users: store,
        }
    }
}
