//! Authentication boundary.
//!
//! The managed authentication service issues identities and keeps the current
//! session. The synchronizer consumes `AuthProvider::identity` to derive the
//! user scope key.

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// An authenticated principal as reported by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FederatedProvider {
    Google,
}

/// The profile a federated provider vouches for after a successful popup or
/// redirect flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedAssertion {
    pub provider: FederatedProvider,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, DomainError>;

    /// Create an account and sign it in.
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, DomainError>;

    async fn sign_in_federated(
        &self,
        assertion: FederatedAssertion,
    ) -> Result<Identity, DomainError>;

    async fn sign_out(&self) -> Result<(), DomainError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), DomainError>;

    /// Current identity; changes on every sign-in and sign-out.
    fn identity(&self) -> watch::Receiver<Option<Identity>>;
}
