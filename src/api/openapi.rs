//! OpenAPI document for the REST surface.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{
    CreateVideoRequest, CreateVideoResponse, LoginRequest, LoginResponse, MeResponse,
    VideoListResponse,
};
use super::handlers::{system, user, video};
use crate::domain::Video;
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "vidshare-gateway", description = "Video sharing REST API and WebSocket broadcast"),
    paths(
        system::health_handler,
        user::login,
        user::me,
        video::create_video,
        video::list_videos,
        video::get_video,
    ),
    components(schemas(
        system::HealthResponse,
        LoginRequest,
        LoginResponse,
        MeResponse,
        Video,
        CreateVideoRequest,
        CreateVideoResponse,
        VideoListResponse,
        ErrorResponse,
        ErrorBody,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "System", description = "Health"),
        (name = "Auth", description = "Login"),
        (name = "Users", description = "Accounts"),
        (name = "Videos", description = "Sharing and listing videos"),
    )
)]
pub struct ApiDoc;

#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
