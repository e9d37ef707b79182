//! Reqwest-backed authorisation-code exchange.
//!
//! This adapter owns transport details only: token endpoint calls, profile
//! fetches and JSON decoding into a provider-neutral profile. Sign-in policy
//! lives in the domain layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::domain::ports::{ExchangeError, ProviderExchange};
use crate::domain::{Provider, ProviderProfile};

use super::dto::{FacebookUserDto, GitHubUserDto, TokenResponseDto};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "dashboard-backend/0.1";

const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_PROFILE_URL: &str = "https://api.github.com/user";
const FACEBOOK_TOKEN_URL: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const FACEBOOK_PROFILE_URL: &str = "https://graph.facebook.com/v19.0/me";

/// Client id and secret registered with one provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Exchanges authorisation codes against the real GitHub and Facebook APIs.
pub struct HttpProviderExchange {
    client: Client,
    github: ProviderCredentials,
    facebook: ProviderCredentials,
}

impl HttpProviderExchange {
    /// Build an exchange adapter with a dedicated reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        github: ProviderCredentials,
        facebook: ProviderCredentials,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            github,
            facebook,
        })
    }

    fn credentials(&self, provider: Provider) -> &ProviderCredentials {
        match provider {
            Provider::GitHub => &self.github,
            Provider::Facebook => &self.facebook,
        }
    }

    async fn fetch_token(
        &self,
        provider: Provider,
        code: &str,
    ) -> Result<String, ExchangeError> {
        let credentials = self.credentials(provider);
        let request = match provider {
            Provider::GitHub => self
                .client
                .post(GITHUB_TOKEN_URL)
                .header(reqwest::header::ACCEPT, "application/json")
                .form(&[
                    ("client_id", credentials.client_id.as_str()),
                    ("client_secret", credentials.client_secret.as_str()),
                    ("code", code),
                    ("redirect_uri", credentials.redirect_uri.as_str()),
                ]),
            Provider::Facebook => self.client.get(FACEBOOK_TOKEN_URL).query(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", credentials.redirect_uri.as_str()),
            ]),
        };

        let response = request
            .send()
            .await
            .map_err(|error| ExchangeError::token(provider, error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ExchangeError::token(provider, error.to_string()))?;
        if !status.is_success() {
            return Err(ExchangeError::token(provider, status_message(status)));
        }

        let decoded: TokenResponseDto = serde_json::from_slice(&body)
            .map_err(|error| ExchangeError::token(provider, error.to_string()))?;
        match decoded.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ExchangeError::token(
                provider,
                decoded
                    .error_description
                    .unwrap_or_else(|| "token response carried no access token".to_owned()),
            )),
        }
    }

    async fn fetch_profile(
        &self,
        provider: Provider,
        access_token: &str,
    ) -> Result<ProviderProfile, ExchangeError> {
        let request = match provider {
            Provider::GitHub => self
                .client
                .get(GITHUB_PROFILE_URL)
                .bearer_auth(access_token)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .header(reqwest::header::ACCEPT, "application/json"),
            Provider::Facebook => self.client.get(FACEBOOK_PROFILE_URL).query(&[
                ("fields", "id,name,email,picture"),
                ("access_token", access_token),
            ]),
        };

        let response = request
            .send()
            .await
            .map_err(|error| ExchangeError::profile(provider, error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ExchangeError::profile(provider, error.to_string()))?;
        if !status.is_success() {
            return Err(ExchangeError::profile(provider, status_message(status)));
        }

        match provider {
            Provider::GitHub => serde_json::from_slice::<GitHubUserDto>(&body)
                .map(GitHubUserDto::into_profile)
                .map_err(|error| ExchangeError::profile(provider, error.to_string())),
            Provider::Facebook => serde_json::from_slice::<FacebookUserDto>(&body)
                .map(FacebookUserDto::into_profile)
                .map_err(|error| ExchangeError::profile(provider, error.to_string())),
        }
    }
}

fn status_message(status: StatusCode) -> String {
    format!("provider responded with status {}", status.as_u16())
}

#[async_trait]
impl ProviderExchange for HttpProviderExchange {
    async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
    ) -> Result<ProviderProfile, ExchangeError> {
        let access_token = self.fetch_token(provider, code).await?;
        self.fetch_profile(provider, &access_token).await
    }
}
