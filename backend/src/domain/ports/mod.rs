//! Ports: trait seams between the domain and its adapters.
//!
//! Outbound adapters in `outbound` implement these traits; domain services
//! depend only on the traits so tests can substitute stubs.

pub mod customer_repository;
pub mod invoice_repository;
pub mod listing_cache;
pub mod login_service;
pub mod provider_exchange;
pub mod user_repository;

pub use customer_repository::{CustomerPatch, CustomerRepository};
pub use invoice_repository::{InvoicePatch, InvoiceRepository};
pub use listing_cache::ListingCache;
pub use login_service::LoginService;
pub use provider_exchange::{ExchangeError, ProviderExchange};
pub use user_repository::UserRepository;

use crate::domain::error::Error;

/// Storage failure reported by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The backing store could not be reached.
    #[error("storage connection failed: {message}")]
    Connection { message: String },
    /// A statement failed or returned malformed data.
    #[error("storage query failed: {message}")]
    Query { message: String },
}

impl PersistenceError {
    /// A connection-level failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// A query-level failure.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<PersistenceError> for Error {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::Connection { message } => Error::service_unavailable(message),
            PersistenceError::Query { message } => Error::internal(message),
        }
    }
}
