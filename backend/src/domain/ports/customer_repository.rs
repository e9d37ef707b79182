//! Port for owner-scoped customer storage.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::customer::Customer;
use crate::domain::id::{CustomerId, UserId};
use crate::domain::user::EmailAddress;

/// Fields a customer update may change. Owner and id never change.
#[derive(Debug, Clone)]
pub struct CustomerPatch {
    pub name: String,
    pub email: EmailAddress,
    pub image_url: Option<String>,
}

/// Storage seam for customers. Every read and write is scoped to the owner;
/// adapters must filter by `owner_id` in the statement itself so a foreign
/// id behaves exactly like a missing one.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a new customer row.
    async fn insert(&self, customer: &Customer) -> Result<(), PersistenceError>;

    /// All customers owned by `owner`, ordered by name.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Customer>, PersistenceError>;

    /// Fetch one customer, scoped to the owner.
    async fn find_scoped(
        &self,
        owner: &UserId,
        id: &CustomerId,
    ) -> Result<Option<Customer>, PersistenceError>;

    /// Apply a patch to one owner-scoped customer, returning the number of
    /// rows affected (0 when the id is missing or foreign).
    async fn update_scoped(
        &self,
        owner: &UserId,
        id: &CustomerId,
        patch: &CustomerPatch,
    ) -> Result<u64, PersistenceError>;

    /// Delete one owner-scoped customer, returning the number of rows
    /// affected.
    async fn delete_scoped(
        &self,
        owner: &UserId,
        id: &CustomerId,
    ) -> Result<u64, PersistenceError>;
}
