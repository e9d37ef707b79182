//! Port for owner-scoped invoice storage.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::id::{CustomerId, InvoiceId, UserId};
use crate::domain::invoice::{AmountCents, Invoice, InvoiceStatus};

/// Fields an invoice update may change. Owner, id, and date never change.
#[derive(Debug, Clone)]
pub struct InvoicePatch {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

/// Storage seam for invoices. Every read and write is scoped to the owner;
/// adapters must filter by `owner_id` in the statement itself so a foreign
/// id behaves exactly like a missing one.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert a new invoice row.
    async fn insert(&self, invoice: &Invoice) -> Result<(), PersistenceError>;

    /// All invoices owned by `owner`, newest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Invoice>, PersistenceError>;

    /// Fetch one invoice, scoped to the owner.
    async fn find_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>, PersistenceError>;

    /// Whether an owner-scoped invoice exists.
    async fn exists_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
    ) -> Result<bool, PersistenceError>;

    /// Apply a patch to one owner-scoped invoice, returning the number of
    /// rows affected (0 when the id is missing or foreign).
    async fn update_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
        patch: &InvoicePatch,
    ) -> Result<u64, PersistenceError>;

    /// Delete one owner-scoped invoice, returning the number of rows
    /// affected.
    async fn delete_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
    ) -> Result<u64, PersistenceError>;
}
