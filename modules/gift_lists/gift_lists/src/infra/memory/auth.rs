use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::{AuthProvider, FederatedAssertion, Identity};

const MIN_PASSWORD_LENGTH: usize = 6;

/// Argon2id memory cost in KiB, kept small so tests can register freely.
const HASH_MEMORY_KIB: u32 = 1024;

struct Account {
    uid: Uuid,
    email: String,
    display_name: Option<String>,
    photo_url: Option<String>,
    /// PHC string; `None` for accounts that only ever signed in through a
    /// provider.
    password_hash: Option<String>,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity {
            uid: self.uid,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// In-process authentication service holding one session.
///
/// Accounts are keyed by lower-cased email. Passwords are kept as Argon2id
/// PHC strings; password-reset requests land in an outbox instead of being
/// mailed.
pub struct MemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    reset_outbox: Mutex<Vec<String>>,
    session: watch::Sender<Option<Identity>>,
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            reset_outbox: Mutex::new(Vec::new()),
            session: watch::Sender::new(None),
        }
    }

    /// Emails a password reset was requested for, oldest first.
    #[must_use]
    pub fn password_resets(&self) -> Vec<String> {
        self.reset_outbox.lock().clone()
    }

    fn start_session(&self, identity: Identity) -> Identity {
        info!(user_id = %identity.uid, "Signed in");
        self.session.send_replace(Some(identity.clone()));
        identity
    }
}

fn hasher() -> Result<Argon2<'static>, DomainError> {
    let params = Params::new(HASH_MEMORY_KIB, 1, 1, None)
        .map_err(|e| DomainError::auth(format!("invalid hashing parameters: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::auth(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        return false;
    };
    hasher().is_ok_and(|argon2| argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(DomainError::auth("invalid email address")),
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, DomainError> {
        let key = normalize_email(email)?;
        let account = self
            .accounts
            .lock()
            .get(&key)
            .map(|a| (a.identity(), a.password_hash.clone()));

        match account {
            Some((identity, Some(phc))) if verify_password(password, &phc) => {
                Ok(self.start_session(identity))
            }
            _ => {
                warn!("Rejected sign-in");
                Err(DomainError::auth("invalid email or password"))
            }
        }
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, DomainError> {
        let key = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::auth(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        let password_hash = hash_password(password)?;

        let identity = {
            let mut accounts = self.accounts.lock();
            if accounts.contains_key(&key) {
                return Err(DomainError::auth("email already in use"));
            }
            let uid = Uuid::now_v7();
            let display_name = Some(display_name.trim().to_owned()).filter(|n| !n.is_empty());
            let account = Account {
                uid,
                email: key.clone(),
                display_name,
                photo_url: None,
                password_hash: Some(password_hash),
            };
            let identity = account.identity();
            accounts.insert(key, account);
            identity
        };
        info!(user_id = %identity.uid, "Registered account");
        Ok(self.start_session(identity))
    }

    /// Links to an existing account with the same email, or creates one.
    async fn sign_in_federated(
        &self,
        assertion: FederatedAssertion,
    ) -> Result<Identity, DomainError> {
        let key = normalize_email(&assertion.email)?;
        let identity = {
            let mut accounts = self.accounts.lock();
            let account = accounts.entry(key.clone()).or_insert_with(|| Account {
                uid: Uuid::now_v7(),
                email: key,
                display_name: None,
                photo_url: None,
                password_hash: None,
            });
            if assertion.display_name.is_some() {
                account.display_name = assertion.display_name;
            }
            if assertion.photo_url.is_some() {
                account.photo_url = assertion.photo_url;
            }
            account.identity()
        };
        Ok(self.start_session(identity))
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        if self.session.send_replace(None).is_some() {
            info!("Signed out");
        }
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let key = normalize_email(email)?;
        if !self.accounts.lock().contains_key(&key) {
            return Err(DomainError::auth("no account for this email"));
        }
        self.reset_outbox.lock().push(key);
        Ok(())
    }

    fn identity(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }
}
