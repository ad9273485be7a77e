//! Global bearer-token filter for the HTTP surface.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::AuthError;
use crate::app_state::AppState;
use crate::error::ShareError;

/// Path prefixes served without an `Authorization` header.
///
/// `/ws` authenticates in-band after the upgrade.
pub const PUBLIC_PREFIXES: &[&str] = &[
    "/health",
    "/api/v1/auth/login",
    "/ws",
    "/swagger-ui",
    "/api-docs",
];

/// Returns `true` if `path` equals a public prefix or lies beneath one.
#[must_use]
pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Requires `Authorization: Bearer <jwt>` on every non-public route and
/// attaches the resulting [`super::AuthUser`] to the request.
///
/// # Errors
///
/// Returns [`ShareError::Unauthorized`] if the header is missing or the
/// token does not verify.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ShareError> {
    if is_public(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingHeader)?;

    let user = state.tokens.authenticate(credential).map_err(|e| {
        tracing::debug!(error = %e, path = %request.uri().path(), "bearer rejected");
        e
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
