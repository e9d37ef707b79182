//! Port for external-provider code exchange.

use async_trait::async_trait;

use crate::domain::auth::{Provider, ProviderProfile};

/// Failure during the authorization-code exchange or profile fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// The code could not be exchanged for an access token.
    #[error("token exchange with {provider} failed: {message}")]
    Token { provider: String, message: String },
    /// The profile could not be fetched or decoded.
    #[error("profile fetch from {provider} failed: {message}")]
    Profile { provider: String, message: String },
}

impl ExchangeError {
    /// A token-exchange failure.
    pub fn token(provider: Provider, message: impl Into<String>) -> Self {
        Self::Token {
            provider: provider.as_str().to_owned(),
            message: message.into(),
        }
    }

    /// A profile-fetch failure.
    pub fn profile(provider: Provider, message: impl Into<String>) -> Self {
        Self::Profile {
            provider: provider.as_str().to_owned(),
            message: message.into(),
        }
    }
}

/// Seam for turning a provider authorization code into a profile.
#[async_trait]
pub trait ProviderExchange: Send + Sync {
    /// Exchange `code` with the provider and fetch the account profile.
    async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
    ) -> Result<ProviderProfile, ExchangeError>;
}
