//! Schema bootstrap for the dashboard database.
//!
//! Applies the table definitions idempotently at startup and optionally
//! seeds a demo account so a fresh database is immediately usable.

use diesel::sql_query;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::info;

use crate::domain::{EmailAddress, User, UserId};

use super::models::UserRow;
use super::password::{hash_password, HashError};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const CREATE_USERS_SQL: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT,
    image TEXT
)";

const CREATE_CUSTOMERS_SQL: &str = "\
CREATE TABLE IF NOT EXISTS customers (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES users (id),
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    image_url TEXT
)";

const CREATE_INVOICES_SQL: &str = "\
CREATE TABLE IF NOT EXISTS invoices (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES users (id),
    customer_id TEXT NOT NULL REFERENCES customers (id),
    amount BIGINT NOT NULL,
    status TEXT NOT NULL,
    date DATE NOT NULL
)";

const DEMO_EMAIL: &str = "user@nextmail.com";
const DEMO_PASSWORD: &str = "123456";

/// Failure while preparing the database schema.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to obtain a database connection: {0}")]
    Pool(#[from] PoolError),
    #[error("schema bootstrap failed: {0}")]
    Migration(#[from] diesel::result::Error),
    #[error(transparent)]
    Hash(#[from] HashError),
    #[error("invalid demo account data: {message}")]
    DemoData { message: String },
}

/// Create the dashboard tables if they do not exist yet.
///
/// All statements run in one transaction, so a partially created schema
/// never survives a failed start.
pub async fn prepare_schema(pool: &DbPool) -> Result<(), BootstrapError> {
    let mut conn = pool.get().await?;
    conn.transaction(|conn| {
        async move {
            sql_query(CREATE_USERS_SQL).execute(conn).await?;
            sql_query(CREATE_CUSTOMERS_SQL).execute(conn).await?;
            sql_query(CREATE_INVOICES_SQL).execute(conn).await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await
    .map_err(BootstrapError::Migration)?;
    info!("database schema ready");
    Ok(())
}

/// Insert the demo account if no row claims its email address yet.
pub async fn seed_demo_user(pool: &DbPool) -> Result<(), BootstrapError> {
    let email = EmailAddress::parse(DEMO_EMAIL).map_err(|error| BootstrapError::DemoData {
        message: error.to_string(),
    })?;
    let demo = User {
        id: UserId::random(),
        name: "User".to_owned(),
        email,
        password_hash: Some(hash_password(DEMO_PASSWORD)?),
        image: None,
    };
    let inserted = diesel::insert_into(users::table)
        .values(UserRow::from_domain(&demo))
        .on_conflict(users::email)
        .do_nothing()
        .execute(&mut pool.get().await?)
        .await
        .map_err(BootstrapError::Migration)?;
    if inserted > 0 {
        info!(email = DEMO_EMAIL, "seeded demo account");
    }
    Ok(())
}
