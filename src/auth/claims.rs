//! Access token claims.

use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::domain::UserId;

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the numeric user id, as a string.
    pub sub: String,
    /// Email of the user. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at (Unix seconds).
    #[serde(default)]
    pub iat: i64,
    /// Expiration (Unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Parses the subject as a user id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidSubject`] if `sub` is not an unsigned
    /// integer.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

/// The caller identity established by a valid bearer token.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Authenticated user.
    pub user_id: UserId,
    /// Email claim, if present.
    pub email: Option<String>,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }
}
