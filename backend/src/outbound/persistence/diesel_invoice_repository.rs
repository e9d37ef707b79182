//! PostgreSQL-backed `InvoiceRepository` implementation using Diesel.
//!
//! Every statement filters by `owner_id` as well as `id`; ownership is
//! enforced in SQL, not in the caller.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InvoicePatch, InvoiceRepository, PersistenceError};
use crate::domain::{Invoice, InvoiceId, UserId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{InvoiceChangeset, InvoiceRow};
use super::pool::DbPool;
use super::schema::invoices;

/// Diesel-backed implementation of the `InvoiceRepository` port.
#[derive(Clone)]
pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for DieselInvoiceRepository {
    async fn insert(&self, invoice: &Invoice) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(invoices::table)
            .values(InvoiceRow::from_domain(invoice))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Invoice>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<InvoiceRow> = invoices::table
            .filter(invoices::owner_id.eq(owner.as_str()))
            .order(invoices::date.desc())
            .select(InvoiceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(InvoiceRow::into_domain).collect()
    }

    async fn find_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<InvoiceRow> = invoices::table
            .filter(invoices::id.eq(id.as_str()))
            .filter(invoices::owner_id.eq(owner.as_str()))
            .select(InvoiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(InvoiceRow::into_domain).transpose()
    }

    async fn exists_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
    ) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            invoices::table
                .filter(invoices::id.eq(id.as_str()))
                .filter(invoices::owner_id.eq(owner.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn update_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
        patch: &InvoicePatch,
    ) -> Result<u64, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            invoices::table
                .filter(invoices::id.eq(id.as_str()))
                .filter(invoices::owner_id.eq(owner.as_str())),
        )
        .set(InvoiceChangeset {
            customer_id: patch.customer_id.as_str(),
            amount: patch.amount.get(),
            status: patch.status.as_str(),
        })
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected as u64)
    }

    async fn delete_scoped(
        &self,
        owner: &UserId,
        id: &InvoiceId,
    ) -> Result<u64, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(
            invoices::table
                .filter(invoices::id.eq(id.as_str()))
                .filter(invoices::owner_id.eq(owner.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected as u64)
    }
}
