//! One live query per scope, run as a cancellable task.

use std::sync::Arc;

use futures::StreamExt;
use futures::future::BoxFuture;
use gift_lists_sdk::{GiftGroup, GiftItem, GiftList};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::view::{ScopeStatus, ScopeView, ViewState};
use crate::domain::error::DomainError;
use crate::domain::repos::SnapshotStream;

/// Scopes are named after the key that drives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ScopeKind {
    /// Keyed by user id; feeds `groups`.
    User,
    /// Keyed by the selected group; feeds `lists`.
    Group,
    /// Keyed by the selected list; feeds `items`.
    List,
}

impl ScopeKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::List => "list",
        }
    }
}

/// Records delivered by a scope's live query.
pub(super) trait ScopeRecords: Clone + Send + Sync + 'static {
    const KIND: ScopeKind;

    fn slice(view: &mut ViewState) -> &mut ScopeView<Self>;

    /// Refresh the selected record from a snapshot that contains it.
    fn refresh_selection(_view: &mut ViewState, _records: &[Self]) {}
}

impl ScopeRecords for GiftGroup {
    const KIND: ScopeKind = ScopeKind::User;

    fn slice(view: &mut ViewState) -> &mut ScopeView<Self> {
        &mut view.groups
    }

    fn refresh_selection(view: &mut ViewState, records: &[Self]) {
        if let Some(ref mut current) = view.current_group
            && let Some(fresh) = records.iter().find(|g| g.id == current.id)
        {
            current.clone_from(fresh);
        }
    }
}

impl ScopeRecords for GiftList {
    const KIND: ScopeKind = ScopeKind::Group;

    fn slice(view: &mut ViewState) -> &mut ScopeView<Self> {
        &mut view.lists
    }

    fn refresh_selection(view: &mut ViewState, records: &[Self]) {
        if let Some(ref mut current) = view.current_list
            && let Some(fresh) = records.iter().find(|l| l.id == current.id)
        {
            current.clone_from(fresh);
        }
    }
}

impl ScopeRecords for GiftItem {
    const KIND: ScopeKind = ScopeKind::List;

    fn slice(view: &mut ViewState) -> &mut ScopeView<Self> {
        &mut view.items
    }
}

struct ScopeTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    task: Option<ScopeTask>,
}

#[derive(Default)]
pub(super) struct Scopes {
    user: Slot,
    group: Slot,
    list: Slot,
}

impl Scopes {
    fn slot(&mut self, kind: ScopeKind) -> &mut Slot {
        match kind {
            ScopeKind::User => &mut self.user,
            ScopeKind::Group => &mut self.group,
            ScopeKind::List => &mut self.list,
        }
    }
}

/// State shared between the synchronizer and its scope tasks.
///
/// Every view write from a scope task happens under the `scopes` lock after
/// checking the scope's generation, so a torn-down scope never writes.
pub(super) struct Shared {
    pub(super) view: watch::Sender<ViewState>,
    pub(super) scopes: Mutex<Scopes>,
}

impl Shared {
    pub(super) fn new() -> Self {
        Self {
            view: watch::Sender::new(ViewState::default()),
            scopes: Mutex::new(Scopes::default()),
        }
    }

    fn write_if_current(
        &self,
        kind: ScopeKind,
        generation: u64,
        f: impl FnOnce(&mut ViewState),
    ) -> bool {
        let mut scopes = self.scopes.lock();
        if scopes.slot(kind).generation != generation {
            return false;
        }
        self.view.send_modify(f);
        true
    }
}

/// Cancels the scope's task and invalidates its generation. The caller
/// holds the `scopes` lock and clears the slice.
pub(super) fn teardown(scopes: &mut Scopes, kind: ScopeKind) {
    let slot = scopes.slot(kind);
    slot.generation = slot.generation.wrapping_add(1);
    if let Some(task) = slot.task.take() {
        task.cancel.cancel();
        task.handle.abort();
        debug!(scope = kind.as_str(), "Scope torn down");
    }
}

/// Registers the live query for a fresh scope. The caller holds the
/// `scopes` lock and has already set the slice to loading.
pub(super) fn start<T: ScopeRecords>(
    shared: &Arc<Shared>,
    scopes: &mut Scopes,
    open: BoxFuture<'static, Result<SnapshotStream<T>, DomainError>>,
) {
    let slot = scopes.slot(T::KIND);
    let generation = slot.generation;
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(run::<T>(
        Arc::clone(shared),
        generation,
        open,
        cancel.clone(),
    ));
    slot.task = Some(ScopeTask { cancel, handle });
    debug!(scope = T::KIND.as_str(), generation, "Scope started");
}

/// Cancels every task without touching the view.
pub(super) fn abort_all(scopes: &mut Scopes) {
    for kind in [ScopeKind::List, ScopeKind::Group, ScopeKind::User] {
        teardown(scopes, kind);
    }
}

async fn run<T: ScopeRecords>(
    shared: Arc<Shared>,
    generation: u64,
    open: BoxFuture<'static, Result<SnapshotStream<T>, DomainError>>,
    cancel: CancellationToken,
) {
    let scope = T::KIND.as_str();
    let fail = |e: &DomainError| {
        warn!(scope, error = %e, "Live query failed");
        let message = e.to_string();
        shared.write_if_current(T::KIND, generation, |v| {
            T::slice(v).status = ScopeStatus::Failed(message);
        });
    };

    let mut stream = tokio::select! {
        biased;

        () = cancel.cancelled() => return,

        opened = open => match opened {
            Ok(stream) => stream,
            Err(e) => {
                fail(&e);
                return;
            }
        },
    };

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                debug!(scope, "Scope cancelled");
                break;
            }

            next = stream.next() => match next {
                Some(Ok(records)) => {
                    let count = records.len();
                    let applied = shared.write_if_current(T::KIND, generation, |v| {
                        T::refresh_selection(v, &records);
                        let slice = T::slice(v);
                        slice.records = records;
                        slice.status = ScopeStatus::Live;
                    });
                    if !applied {
                        break;
                    }
                    debug!(scope, count, "Applied snapshot");
                }
                Some(Err(e)) => {
                    fail(&e);
                    break;
                }
                None => {
                    debug!(scope, "Live query ended");
                    break;
                }
            },
        }
    }
}
