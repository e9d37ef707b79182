//! Credential authentication over the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::{LoginCredentials, User};

use super::password::verify_password;

/// Checks submitted credentials against stored Argon2 hashes.
///
/// Storage failures are logged and reported as "no user" so the response
/// stays indistinguishable from a wrong password even during an outage.
#[derive(Clone)]
pub struct DieselLoginService {
    users: Arc<dyn UserRepository>,
}

impl DieselLoginService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Option<User> {
        let user = match self.users.find_by_email(credentials.email()).await {
            Ok(found) => found?,
            Err(error) => {
                warn!(%error, "credential lookup failed");
                return None;
            }
        };
        let hash = user.password_hash.as_deref().filter(|hash| !hash.is_empty())?;
        if verify_password(hash, credentials.password()) {
            Some(user)
        } else {
            None
        }
    }
}
