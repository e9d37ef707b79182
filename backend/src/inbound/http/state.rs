//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, ProviderExchange, UserRepository};
use crate::domain::{CustomerService, InvoiceService, ProviderSignIn};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserRepository>,
    pub oauth: Arc<dyn ProviderExchange>,
    pub provider_signin: Arc<ProviderSignIn>,
    pub customers: Arc<CustomerService>,
    pub invoices: Arc<InvoiceService>,
}
