//! Login and account DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;
use crate::service::Session;

/// Request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// OAuth authorization code issued by the identity provider.
    pub code: String,
    /// Redirect URL the code was issued for.
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
}

/// Response body for `POST /api/v1/auth/login`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the REST API and the WebSocket.
    pub token: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar: String,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            name: session.name,
            avatar: session.avatar,
        }
    }
}

/// Response body for `GET /api/v1/users/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    /// User id.
    pub id: u64,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            email: user.email,
            name: user.name,
        }
    }
}
