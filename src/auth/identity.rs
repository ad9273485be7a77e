//! External identity provider used by the login flow.
//!
//! Login is password-less: the client obtains an OAuth authorization code
//! from Google and posts it to `/api/v1/auth/login`. The gateway exchanges
//! the code for an access token and reads the user's profile with it.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GoogleOAuthConfig;
use crate::error::ShareError;

/// Profile returned by the identity provider after a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalProfile {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Verified email; the local account key.
    #[serde(default)]
    pub email: String,
    /// Avatar URL.
    #[serde(default)]
    pub picture: String,
}

/// Exchanges an OAuth authorization code for the caller's profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync + fmt::Debug {
    /// Redeems `code` (issued for `redirect_url`) and returns the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::IdentityProvider`] if the provider rejects the
    /// code, cannot be reached, or returns a profile without an email.
    async fn exchange(&self, code: &str, redirect_url: &str)
    -> Result<ExternalProfile, ShareError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth 2.0 implementation of [`IdentityProvider`].
#[derive(Clone)]
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl fmt::Debug for GoogleIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleIdentityProvider")
            .field("client_id", &self.config.client_id)
            .field("token_url", &self.config.token_url)
            .field("profile_url", &self.config.profile_url)
            .finish_non_exhaustive()
    }
}

impl GoogleIdentityProvider {
    /// Creates a provider from the OAuth client configuration.
    #[must_use]
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

fn provider_error(stage: &str, err: &reqwest::Error) -> ShareError {
    ShareError::IdentityProvider(format!("{stage} failed: {err}"))
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn exchange(
        &self,
        code: &str,
        redirect_url: &str,
    ) -> Result<ExternalProfile, ShareError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", redirect_url),
            ("grant_type", "authorization_code"),
        ];

        let token: TokenResponse = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| provider_error("token exchange", &e))?
            .json()
            .await
            .map_err(|e| provider_error("token decode", &e))?;

        let profile: ExternalProfile = self
            .client
            .get(&self.config.profile_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| provider_error("profile fetch", &e))?
            .json()
            .await
            .map_err(|e| provider_error("profile decode", &e))?;

        if profile.email.is_empty() {
            return Err(ShareError::IdentityProvider(
                "profile has no email".to_string(),
            ));
        }

        tracing::debug!(email = %profile.email, "identity provider exchange succeeded");
        Ok(profile)
    }
}
