use std::sync::Arc;

use gift_lists_sdk::GiftListsClient;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::GiftListsConfig;
use crate::domain::ports::AuthProvider;
use crate::domain::repos::Repositories;
use crate::domain::service::AppServices;
use crate::infra::memory::MemoryStore;
use crate::local_client::GiftListsLocalClient;
use crate::sync::{self, Synchronizer};

/// Composition root: services, the SDK client and synchronizers over one set
/// of repositories.
#[derive(Clone)]
pub struct GiftLists {
    repos: Repositories,
    services: Arc<AppServices>,
    client: Arc<dyn GiftListsClient>,
}

impl GiftLists {
    #[must_use]
    pub fn new(repos: Repositories, cfg: GiftListsConfig) -> Self {
        debug!(
            "Loaded gift_lists config: max_name_length={}, warning_percent={}",
            cfg.service.max_name_length, cfg.budget.warning_percent
        );
        let services = Arc::new(AppServices::new(&repos, cfg.service, cfg.budget));
        let client: Arc<dyn GiftListsClient> =
            Arc::new(GiftListsLocalClient::new(Arc::clone(&services)));
        info!("gift_lists module initialized");
        Self {
            repos,
            services,
            client,
        }
    }

    /// Module over a fresh in-process store. The store is returned too, for
    /// fault injection and listener accounting.
    #[must_use]
    pub fn in_memory(cfg: GiftListsConfig) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let module = Self::new(Repositories::from_store(Arc::clone(&store)), cfg);
        (module, store)
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn GiftListsClient> {
        Arc::clone(&self.client)
    }

    #[must_use]
    pub fn services(&self) -> Arc<AppServices> {
        Arc::clone(&self.services)
    }

    /// A new synchronizer with an empty view.
    #[must_use]
    pub fn synchronizer(&self) -> Arc<Synchronizer> {
        Arc::new(Synchronizer::new(&self.repos))
    }

    /// Drive `sync` from `auth`'s identity until `cancel` fires.
    pub fn follow_identity(
        &self,
        sync: Arc<Synchronizer>,
        auth: &dyn AuthProvider,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        sync::follow_identity(
            sync,
            Arc::clone(&self.services.users),
            auth.identity(),
            cancel,
        )
    }
}
