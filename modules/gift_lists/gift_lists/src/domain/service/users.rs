use std::sync::Arc;

use gift_lists_sdk::{Actor, EntityKind, NewUser, Preferences, User, UserPatch};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::ports::Identity;
use crate::domain::repos::UsersRepository;

pub struct UsersService {
    repo: Arc<dyn UsersRepository>,
    config: Arc<ServiceConfig>,
}

impl UsersService {
    pub(super) fn new(repo: Arc<dyn UsersRepository>, config: Arc<ServiceConfig>) -> Self {
        Self { repo, config }
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::User, id))
    }

    /// Patch the actor's own profile.
    #[instrument(skip(self, actor, patch), fields(user_id = %actor.user_id()))]
    pub async fn update_user(&self, actor: Actor, mut patch: UserPatch) -> Result<(), DomainError> {
        info!("Updating user profile");
        self.config.validator().user_patch(&patch)?;
        self.get_user(actor.user_id()).await?;

        patch.display_name = patch.display_name.map(|n| n.trim().to_owned());
        self.repo.update(actor.user_id(), &patch).await?;
        info!("Successfully updated user profile");
        Ok(())
    }

    /// Returns the stored profile for `identity`, creating it with default
    /// preferences on first sign-in.
    #[instrument(skip(self, identity), fields(user_id = %identity.uid))]
    pub async fn ensure_profile(&self, identity: &Identity) -> Result<User, DomainError> {
        if let Some(user) = self.repo.get(identity.uid).await? {
            debug!("Profile already exists");
            return Ok(user);
        }

        let user = self
            .repo
            .create(NewUser {
                id: identity.uid,
                email: identity.email.clone(),
                display_name: default_display_name(identity),
                photo_url: identity.photo_url.clone(),
                preferences: Preferences::default(),
            })
            .await?;
        info!("Provisioned user profile");
        Ok(user)
    }
}

/// Provider display name, else the local part of the email.
fn default_display_name(identity: &Identity) -> String {
    identity
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .or_else(|| identity.email.split('@').next().filter(|l| !l.is_empty()))
        .unwrap_or("User")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str, display_name: Option<&str>) -> Identity {
        Identity {
            uid: Uuid::new_v4(),
            email: email.to_owned(),
            display_name: display_name.map(str::to_owned),
            photo_url: None,
        }
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        assert_eq!(
            default_display_name(&identity("ada@example.com", Some("Ada L"))),
            "Ada L"
        );
        assert_eq!(
            default_display_name(&identity("ada@example.com", Some("  "))),
            "ada"
        );
        assert_eq!(default_display_name(&identity("ada@example.com", None)), "ada");
        assert_eq!(default_display_name(&identity("@example.com", None)), "User");
    }
}
