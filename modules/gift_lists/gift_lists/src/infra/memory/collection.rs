use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

use futures::StreamExt;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::SnapshotStream;

pub(super) type Filter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Failure switches shared by every collection of a store.
#[derive(Debug, Default)]
pub(super) struct Faults {
    pub(super) unavailable: AtomicBool,
    pub(super) subscriptions_rejected: AtomicBool,
}

impl Faults {
    pub(super) fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(AtomicOrdering::Acquire) {
            return Err(DomainError::remote("data service unavailable"));
        }
        Ok(())
    }
}

/// One document collection. Every mutation bumps the revision, which wakes
/// the live queries.
pub(super) struct Collection<T> {
    docs: Arc<RwLock<HashMap<Uuid, T>>>,
    revision: watch::Sender<u64>,
    listeners: Arc<AtomicUsize>,
    order: fn(&T, &T) -> Ordering,
}

impl<T: Clone + Send + Sync + 'static> Collection<T> {
    pub(super) fn new(order: fn(&T, &T) -> Ordering) -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
            revision: watch::Sender::new(0),
            listeners: Arc::new(AtomicUsize::new(0)),
            order,
        }
    }

    pub(super) fn get(&self, id: Uuid) -> Option<T> {
        self.docs.read().get(&id).cloned()
    }

    pub(super) fn query(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        snapshot(&self.docs.read(), &filter, self.order)
    }

    pub(super) fn insert(&self, id: Uuid, doc: T) {
        self.docs.write().insert(id, doc);
        self.bump();
    }

    /// Applies `f` to an existing document. Fails when the id is unknown.
    pub(super) fn modify(
        &self,
        id: Uuid,
        not_found: impl FnOnce() -> DomainError,
        f: impl FnOnce(&mut T),
    ) -> Result<(), DomainError> {
        {
            let mut docs = self.docs.write();
            let doc = docs.get_mut(&id).ok_or_else(not_found)?;
            f(doc);
        }
        self.bump();
        Ok(())
    }

    /// Deleting a missing id succeeds.
    pub(super) fn remove(&self, id: Uuid) {
        let removed = self.docs.write().remove(&id).is_some();
        if removed {
            self.bump();
        }
    }

    /// Wakes live queries without changing any document.
    pub(super) fn bump(&self) {
        self.revision.send_modify(|r| *r = r.wrapping_add(1));
    }

    pub(super) fn listener_count(&self) -> usize {
        self.listeners.load(AtomicOrdering::Acquire)
    }

    /// Emits the current matching set right away and again after every
    /// change. When subscriptions are rejected the stream yields one error
    /// and ends.
    pub(super) fn watch(&self, filter: Filter<T>, faults: Arc<Faults>) -> SnapshotStream<T> {
        let state = LiveQuery {
            changes: WatchStream::new(self.revision.subscribe()),
            docs: Arc::clone(&self.docs),
            filter,
            order: self.order,
            faults,
            _guard: ListenerGuard::new(Arc::clone(&self.listeners)),
            done: false,
        };

        futures::stream::unfold(state, |mut q| async move {
            if q.done {
                return None;
            }
            q.changes.next().await?;
            if q.faults.subscriptions_rejected.load(AtomicOrdering::Acquire) {
                q.done = true;
                let err = DomainError::remote("permission denied for live query");
                return Some((Err(err), q));
            }
            let docs = snapshot(&q.docs.read(), q.filter.as_ref(), q.order);
            Some((Ok(docs), q))
        })
        .boxed()
    }
}

fn snapshot<T: Clone>(
    docs: &HashMap<Uuid, T>,
    filter: &dyn Fn(&T) -> bool,
    order: fn(&T, &T) -> Ordering,
) -> Vec<T> {
    let mut out: Vec<T> = docs.values().filter(|d| filter(d)).cloned().collect();
    out.sort_by(order);
    out
}

struct LiveQuery<T> {
    changes: WatchStream<u64>,
    docs: Arc<RwLock<HashMap<Uuid, T>>>,
    filter: Filter<T>,
    order: fn(&T, &T) -> Ordering,
    faults: Arc<Faults>,
    _guard: ListenerGuard,
    done: bool,
}

/// Counts a registered listener until the stream holding it is dropped.
struct ListenerGuard(Arc<AtomicUsize>);

impl ListenerGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, AtomicOrdering::AcqRel);
        Self(counter)
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, AtomicOrdering::AcqRel);
    }
}
