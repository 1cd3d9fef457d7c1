//! API credentials.

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Default environment variable holding the GitHub API token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_API_TOKEN";

/// Bearer token for the release-hosting API.
///
/// Read once at startup and passed explicitly to the components that need
/// it. The token is redacted from `Debug` output.
pub struct Credentials {
    token: SecretString,
}

impl Credentials {
    /// Wraps a token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if the token is empty or blank.
    pub fn new(token: impl Into<String>, source: &str) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::missing_credentials(source));
        }
        Ok(Self {
            token: SecretString::from(token),
        })
    }

    /// Reads the token from the named environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if the variable is unset or empty.
    pub fn from_env(var: &str) -> Result<Self> {
        let token = std::env::var(var).map_err(|_| Error::missing_credentials(var))?;
        Self::new(token, var)
    }

    /// Like [`Credentials::from_env`], but absence is not an error.
    ///
    /// The release entry points check for credentials themselves, so the CLI
    /// loads them leniently and lets the orchestrator fail first.
    #[must_use]
    pub fn from_env_optional(var: &str) -> Option<Self> {
        Self::from_env(var).ok()
    }

    /// The raw token, for building the `Authorization` header.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .finish()
    }
}
