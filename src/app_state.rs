//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenService;
use crate::domain::BroadcastHub;
use crate::service::{UserService, VideoService};

/// WebSocket admission settings.
#[derive(Debug, Clone, Copy)]
pub struct WsSettings {
    /// How long a new connection may take to send its credentials.
    pub auth_timeout: Duration,
    /// Capacity of each subscriber's outbound queue.
    pub outbox_capacity: usize,
}

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Video sharing and listing.
    pub video_service: Arc<VideoService>,
    /// Login and account lookup.
    pub user_service: Arc<UserService>,
    /// Broadcast hub new subscribers are admitted into.
    pub hub: BroadcastHub,
    /// Access token verification.
    pub tokens: Arc<TokenService>,
    /// WebSocket admission settings.
    pub ws: WsSettings,
}
