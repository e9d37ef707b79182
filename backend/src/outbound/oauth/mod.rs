//! OAuth provider adapters for the authorisation-code exchange port.

mod dto;
mod http_exchange;

pub use http_exchange::{HttpProviderExchange, ProviderCredentials};
