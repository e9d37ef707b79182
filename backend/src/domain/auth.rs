//! Authentication primitives: credential shapes, external provider
//! profiles, and the fixed vocabulary of sign-in error codes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::EmailAddress;

/// Minimum accepted password length for credential sign-in.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Validated credential pair submitted to the login endpoint.
///
/// Shape validation happens here so the login service only ever sees
/// plausible input; anything else is treated as a failed sign-in without
/// touching storage.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: String,
}

impl LoginCredentials {
    /// Validate the submitted pair. Returns `None` when the email is
    /// malformed or the password is shorter than [`PASSWORD_MIN_LEN`].
    pub fn parse(email: &str, password: &str) -> Option<Self> {
        let email = EmailAddress::parse(email).ok()?;
        if password.len() < PASSWORD_MIN_LEN {
            return None;
        }
        Some(Self {
            email,
            password: password.to_owned(),
        })
    }

    /// The validated sign-in address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The raw submitted password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Supported external identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    GitHub,
    Facebook,
}

impl Provider {
    /// Parse the lowercase path token used in callback URLs.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "github" => Some(Self::GitHub),
            "facebook" => Some(Self::Facebook),
            _ => None,
        }
    }

    /// The lowercase path token for this provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile fields returned by an external provider after a successful
/// authorization-code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider-side account identifier.
    pub id: String,
    /// Display name, when the provider supplies one.
    pub name: Option<String>,
    /// Verified address, when the provider shares it.
    pub email: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
}

/// Fixed vocabulary of sign-in failure codes surfaced on the error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    Configuration,
    AccessDenied,
    EmailSignin,
    OAuthSignin,
    OAuthCallback,
    OAuthCreateAccount,
    Callback,
}

impl AuthErrorCode {
    /// Parse the exact query-string token.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Configuration" => Some(Self::Configuration),
            "AccessDenied" => Some(Self::AccessDenied),
            "EmailSignin" => Some(Self::EmailSignin),
            "OAuthSignin" => Some(Self::OAuthSignin),
            "OAuthCallback" => Some(Self::OAuthCallback),
            "OAuthCreateAccount" => Some(Self::OAuthCreateAccount),
            "Callback" => Some(Self::Callback),
            _ => None,
        }
    }

    /// The query-string token for this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "Configuration",
            Self::AccessDenied => "AccessDenied",
            Self::EmailSignin => "EmailSignin",
            Self::OAuthSignin => "OAuthSignin",
            Self::OAuthCallback => "OAuthCallback",
            Self::OAuthCreateAccount => "OAuthCreateAccount",
            Self::Callback => "Callback",
        }
    }

    /// Human-readable description shown on the error page.
    pub fn description(self) -> &'static str {
        match self {
            Self::Configuration => "There is a problem with the server configuration.",
            Self::AccessDenied => "You do not have permission to sign in.",
            Self::EmailSignin => "The e-mail could not be sent.",
            Self::OAuthSignin => "Error in constructing an authorization URL.",
            Self::OAuthCallback => "Error in handling the response from an OAuth provider.",
            Self::OAuthCreateAccount => "Could not create OAuth provider user in the database.",
            Self::Callback => "Error in the OAuth callback handler route.",
        }
    }

    /// Description for an unrecognised or absent code.
    pub fn unknown_description() -> &'static str {
        "An unknown error occurred."
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
