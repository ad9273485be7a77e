//! HMAC-signed access tokens.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{AuthError, AuthUser, Claims};
use crate::domain::User;

/// Issues and verifies access tokens.
///
/// Tokens are signed with HS512. Verification accepts any HMAC algorithm
/// keyed by the same secret and rejects everything else.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a service keyed by `secret`, issuing tokens valid for `ttl`.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
            validation,
            ttl,
        }
    }

    /// Issues an access token for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.id.to_string(),
            email: Some(user.email.clone()),
            iat: now,
            exp: now.saturating_add(ttl),
        };
        self.sign(&claims)
    }

    /// Signs arbitrary claims with the service key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if encoding fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS512), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verifies a raw token's signature and expiry and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Expired`] for an expired token and
    /// [`AuthError::InvalidToken`] for any other verification failure.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    /// Verifies a `Bearer <token>` credential and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidScheme`] if the prefix is missing, or any
    /// error from [`TokenService::validate`].
    pub fn validate_bearer(&self, credential: &str) -> Result<Claims, AuthError> {
        self.validate(parse_bearer(credential)?)
    }

    /// Authenticates a `Bearer <token>` credential.
    ///
    /// # Errors
    ///
    /// Any error from [`TokenService::validate_bearer`], or
    /// [`AuthError::InvalidSubject`] if `sub` is not a numeric user id.
    pub fn authenticate(&self, credential: &str) -> Result<AuthUser, AuthError> {
        AuthUser::try_from(self.validate_bearer(credential)?)
    }
}

/// Extracts the token from a `Bearer <token>` credential.
///
/// # Errors
///
/// Returns [`AuthError::InvalidScheme`] if the scheme is not exactly
/// `Bearer` or the token part is empty.
pub fn parse_bearer(credential: &str) -> Result<&str, AuthError> {
    match credential.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidScheme),
    }
}
