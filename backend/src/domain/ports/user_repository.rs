//! Port for user identity storage.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::id::UserId;
use crate::domain::user::{EmailAddress, User};

/// Storage seam for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user row.
    async fn insert(&self, user: &User) -> Result<(), PersistenceError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;

    /// Look up a user by sign-in address.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<User>, PersistenceError>;

    /// Update the display name and avatar of an existing user, returning the
    /// stored record.
    async fn update_profile(
        &self,
        id: &UserId,
        name: &str,
        image: Option<&str>,
    ) -> Result<User, PersistenceError>;
}
