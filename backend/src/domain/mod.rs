//! Domain layer: entities, validation, ports, and services.
//!
//! Nothing in this module touches HTTP or SQL; inbound adapters call the
//! services, outbound adapters implement the ports.

pub mod auth;
pub mod customer;
pub mod customer_service;
pub mod error;
pub mod forms;
pub mod id;
pub mod invoice;
pub mod invoice_service;
pub mod ports;
pub mod provider_signin;
pub mod user;

pub use auth::{AuthErrorCode, LoginCredentials, Provider, ProviderProfile};
pub use customer::Customer;
pub use customer_service::{CustomerService, CUSTOMERS_PATH};
pub use error::{Error, ErrorCode};
pub use forms::{CustomerForm, FieldErrors, FormRejection, InvoiceForm, RedirectTo};
pub use id::{CustomerId, InvoiceId, UserId};
pub use invoice::{AmountCents, Invoice, InvoiceStatus};
pub use invoice_service::{EditInvoiceData, InvoiceService, INVOICES_PATH};
pub use provider_signin::{ProviderSignIn, SignInRejection};
pub use user::{EmailAddress, User};

/// Result alias for operations that surface the domain error payload.
pub type ApiResult<T> = Result<T, Error>;
