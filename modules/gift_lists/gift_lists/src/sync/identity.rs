use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Synchronizer;
use crate::domain::ports::Identity;
use crate::domain::service::UsersService;

/// Spawn a task that drives the user scope from the authentication
/// service's identity stream.
///
/// Each signed-in identity gets its profile loaded, or created on first
/// sign-in, before `set_user` is called. A profile failure leaves the view
/// signed out. The task runs until cancelled or until the identity stream
/// closes.
pub fn follow_identity(
    sync: Arc<Synchronizer>,
    users: Arc<UsersService>,
    mut identity: watch::Receiver<Option<Identity>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let current = identity.borrow_and_update().clone();
            match current {
                Some(ref id) => match users.ensure_profile(id).await {
                    Ok(user) => sync.set_user(Some(user)),
                    Err(e) => {
                        warn!(user_id = %id.uid, error = %e, "Could not load profile");
                        sync.set_user(None);
                    }
                },
                None => sync.set_user(None),
            }

            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    debug!("identity bridge cancelled");
                    break;
                }

                changed = identity.changed() => {
                    if changed.is_err() {
                        debug!("identity stream closed");
                        break;
                    }
                }
            }
        }
    })
}
