//! Port for credential authentication.

use async_trait::async_trait;

use crate::domain::auth::LoginCredentials;
use crate::domain::user::User;

/// Authentication strategy for credential sign-in.
///
/// Returns `Some(user)` on success and `None` for every failure mode, so
/// callers cannot distinguish "unknown address" from "wrong password" or a
/// storage outage. That uniformity is load-bearing for anti-enumeration.
#[async_trait]
pub trait LoginService: Send + Sync {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Option<User>;
}
