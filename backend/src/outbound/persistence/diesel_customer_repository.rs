//! PostgreSQL-backed `CustomerRepository` implementation using Diesel.
//!
//! Every statement filters by `owner_id` as well as `id`; ownership is
//! enforced in SQL, not in the caller.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CustomerPatch, CustomerRepository, PersistenceError};
use crate::domain::{Customer, CustomerId, UserId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{CustomerChangeset, CustomerRow};
use super::pool::DbPool;
use super::schema::customers;

/// Diesel-backed implementation of the `CustomerRepository` port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn insert(&self, customer: &Customer) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(customers::table)
            .values(CustomerRow::from_domain(customer))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Customer>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CustomerRow> = customers::table
            .filter(customers::owner_id.eq(owner.as_str()))
            .order(customers::name.asc())
            .select(CustomerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(CustomerRow::into_domain).collect()
    }

    async fn find_scoped(
        &self,
        owner: &UserId,
        id: &CustomerId,
    ) -> Result<Option<Customer>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CustomerRow> = customers::table
            .filter(customers::id.eq(id.as_str()))
            .filter(customers::owner_id.eq(owner.as_str()))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(CustomerRow::into_domain).transpose()
    }

    async fn update_scoped(
        &self,
        owner: &UserId,
        id: &CustomerId,
        patch: &CustomerPatch,
    ) -> Result<u64, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            customers::table
                .filter(customers::id.eq(id.as_str()))
                .filter(customers::owner_id.eq(owner.as_str())),
        )
        .set(CustomerChangeset {
            name: &patch.name,
            email: patch.email.as_str(),
            image_url: patch.image_url.as_deref(),
        })
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected as u64)
    }

    async fn delete_scoped(
        &self,
        owner: &UserId,
        id: &CustomerId,
    ) -> Result<u64, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(
            customers::table
                .filter(customers::id.eq(id.as_str()))
                .filter(customers::owner_id.eq(owner.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected as u64)
    }
}
