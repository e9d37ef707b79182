//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! The adapters are thin translators: Diesel row structs (`models.rs`) and
//! the schema definition (`schema.rs`) stay internal, every database error is
//! mapped to a domain `PersistenceError`, and no business logic lives here.
//! Ownership scoping is part of the SQL itself; scoped statements always
//! filter on `owner_id`.

mod bootstrap;
mod diesel_customer_repository;
mod diesel_invoice_repository;
mod diesel_login_service;
mod diesel_user_repository;
mod error_map;
mod models;
pub mod password;
mod pool;
mod schema;

pub use bootstrap::{prepare_schema, seed_demo_user, BootstrapError};
pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_invoice_repository::DieselInvoiceRepository;
pub use diesel_login_service::DieselLoginService;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
