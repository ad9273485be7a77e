//! Login and account handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use crate::api::dto::{LoginRequest, LoginResponse, MeResponse};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::{ErrorResponse, ShareError};

/// `POST /auth/login` — Exchange an OAuth code for an access token.
///
/// # Errors
///
/// Returns [`ShareError`] if the body is invalid or the identity provider
/// rejects the code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Redeems a Google authorization code, creates the account on first login, and returns a bearer token.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing code or redirectURL", body = ErrorResponse),
        (status = 401, description = "Identity provider rejected the code", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ShareError> {
    let Json(req) = body?;
    let session = state
        .user_service
        .login(&req.code, &req.redirect_url)
        .await?;
    Ok(Json(session.into()))
}

/// `GET /users/me` — The authenticated account.
///
/// # Errors
///
/// Returns [`ShareError::UserNotFound`] if the account was removed.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    summary = "Current user",
    responses(
        (status = 200, description = "Authenticated user", body = MeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<MeResponse>, ShareError> {
    let user = state.user_service.me(caller.user_id).await?;
    Ok(Json(user.into()))
}

/// Auth and user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/users/me", get(me))
}
