//! Video handlers: share, list, get.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::api::dto::{CreateVideoRequest, CreateVideoResponse, ListVideosParams, VideoListResponse};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::{Video, VideoId};
use crate::error::{ErrorResponse, ShareError};

/// `POST /videos` — Share a video and announce it to live subscribers.
///
/// # Errors
///
/// Returns [`ShareError`] on an invalid body, unknown user, or storage
/// failure.
#[utoipa::path(
    post,
    path = "/api/v1/videos",
    tag = "Videos",
    summary = "Share a video",
    description = "Stores the video and pushes it to every WebSocket subscriber except the sharer. The response does not depend on the fan-out outcome.",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video shared", body = CreateVideoResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Sharer account not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create_video(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    body: Result<Json<CreateVideoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ShareError> {
    let Json(req) = body?;
    let video = state
        .video_service
        .create(caller.user_id, req.url, req.description)
        .await?;

    Ok((StatusCode::CREATED, Json(CreateVideoResponse { video })))
}

/// `GET /videos` — Paginated video listing.
///
/// # Errors
///
/// Returns [`ShareError::InvalidRequest`] for out-of-range paging or an
/// unsupported sort.
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "Videos",
    summary = "List videos",
    description = "Returns one page of videos with the total count.",
    params(ListVideosParams),
    responses(
        (status = 200, description = "Paginated video list", body = VideoListResponse),
        (status = 400, description = "Invalid paging or sort", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn list_videos(
    State(state): State<AppState>,
    params: Result<Query<ListVideosParams>, QueryRejection>,
) -> Result<Json<VideoListResponse>, ShareError> {
    let Query(params) = params?;
    let page = state.video_service.list(params.into()).await?;
    Ok(Json(page.into()))
}

/// `GET /videos/{id}` — Single video.
///
/// # Errors
///
/// Returns [`ShareError::InvalidRequest`] for a non-numeric id and
/// [`ShareError::VideoNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    tag = "Videos",
    summary = "Get video",
    description = "Returns a video in the same JSON shape that is pushed to WebSocket subscribers.",
    params(("id" = u64, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video", body = Video),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn get_video(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Video>, ShareError> {
    let Path(id) = id?;
    let video = state.video_service.get(VideoId::new(id)).await?;
    Ok(Json(video))
}

/// Video routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route("/videos/{id}", get(get_video))
}
