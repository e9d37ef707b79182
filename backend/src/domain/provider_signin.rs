//! Reconciles an external-provider profile with the local identity store.

use std::sync::Arc;

use tracing::warn;

use super::auth::{AuthErrorCode, ProviderProfile};
use super::id::UserId;
use super::ports::UserRepository;
use super::user::{EmailAddress, User};

/// A sign-in that could not be completed, carrying the error-page code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sign-in rejected: {0}")]
pub struct SignInRejection(pub AuthErrorCode);

/// Turns provider profiles into local user records.
///
/// First sign-in creates the account; later sign-ins refresh the avatar when
/// the provider reports a new one. A profile without an email is refused
/// outright, since the address is the only cross-provider identity anchor.
pub struct ProviderSignIn {
    users: Arc<dyn UserRepository>,
}

impl ProviderSignIn {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Resolve `profile` to a local user, creating or refreshing as needed.
    pub async fn sign_in(&self, profile: &ProviderProfile) -> Result<User, SignInRejection> {
        let Some(raw_email) = profile.email.as_deref() else {
            warn!(provider_account = %profile.id, "provider profile carries no email");
            return Err(SignInRejection(AuthErrorCode::AccessDenied));
        };
        let email = EmailAddress::parse(raw_email).map_err(|_| {
            warn!(provider_account = %profile.id, "provider email is malformed");
            SignInRejection(AuthErrorCode::AccessDenied)
        })?;

        let existing = self.users.find_by_email(&email).await.map_err(|error| {
            warn!(%error, "identity lookup failed during provider sign-in");
            SignInRejection(AuthErrorCode::Callback)
        })?;

        match existing {
            None => {
                let user = User {
                    id: UserId::random(),
                    name: profile.name.clone().unwrap_or_default(),
                    email,
                    password_hash: None,
                    image: profile.image.clone(),
                };
                self.users.insert(&user).await.map_err(|error| {
                    warn!(%error, "identity creation failed during provider sign-in");
                    SignInRejection(AuthErrorCode::OAuthCreateAccount)
                })?;
                Ok(user)
            }
            Some(user) if profile.image.is_some() && profile.image != user.image => {
                let name = profile.name.clone().unwrap_or_else(|| user.name.clone());
                self.users
                    .update_profile(&user.id, &name, profile.image.as_deref())
                    .await
                    .map_err(|error| {
                        warn!(%error, "profile refresh failed during provider sign-in");
                        SignInRejection(AuthErrorCode::Callback)
                    })
            }
            Some(user) => Ok(user),
        }
    }
}
