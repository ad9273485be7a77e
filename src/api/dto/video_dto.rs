//! Video DTOs for share, get, and list operations.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Video;
use crate::service::{ListQuery, VideoPage};

/// Request body for `POST /api/v1/videos`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    /// Link to the video (required, at most 200 characters).
    pub url: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: String,
}

/// Response body for `POST /api/v1/videos` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateVideoResponse {
    /// The stored video.
    pub video: Video,
}

/// Query parameters for `GET /api/v1/videos`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListVideosParams {
    /// Page number (1-indexed). Defaults to 1.
    pub page: Option<u32>,
    /// Items per page, 1 to 200. Defaults to 20.
    pub limit: Option<u32>,
    /// `id`, `created_at`, optionally followed by `asc` or `desc`.
    /// Defaults to `id desc`.
    pub sort: Option<String>,
}

impl From<ListVideosParams> for ListQuery {
    fn from(params: ListVideosParams) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
            sort: params.sort,
        }
    }
}

/// Paginated list response for `GET /api/v1/videos`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoListResponse {
    /// Total number of videos.
    pub total: u64,
    /// Page returned.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
    /// Videos on this page.
    #[serde(rename = "_items")]
    pub items: Vec<Video>,
}

impl From<VideoPage> for VideoListResponse {
    fn from(page: VideoPage) -> Self {
        Self {
            total: page.total,
            page: page.page,
            limit: page.limit,
            items: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_uses_items_key() {
        let response = VideoListResponse::from(VideoPage {
            total: 0,
            page: 1,
            limit: 20,
            items: Vec::new(),
        });
        let json = serde_json::to_value(&response).unwrap_or_default();
        assert!(json.get("_items").is_some());
        assert!(json.get("items").is_none());
        assert_eq!(json["limit"], 20);
    }

    #[test]
    fn description_is_optional() {
        let req: Result<CreateVideoRequest, _> =
            serde_json::from_str(r#"{"url":"https://youtu.be/x"}"#);
        assert!(matches!(req, Ok(r) if r.description.is_empty()));
    }
}
