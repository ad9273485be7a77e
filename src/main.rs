//! vidshare-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vidshare_gateway::api;
use vidshare_gateway::app_state::{AppState, WsSettings};
use vidshare_gateway::auth::{GoogleIdentityProvider, TokenService};
use vidshare_gateway::config::ShareConfig;
use vidshare_gateway::domain::BroadcastHub;
use vidshare_gateway::persistence::{
    InMemoryStore, PostgresStore, UserRepository, VideoRepository,
};
use vidshare_gateway::service::{UserService, VideoService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ShareConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting vidshare-gateway");

    // Persistence
    let (users, videos): (Arc<dyn UserRepository>, Arc<dyn VideoRepository>) =
        if config.persistence_enabled {
            let store = Arc::new(PostgresStore::connect(&config).await?);
            (Arc::clone(&store) as Arc<dyn UserRepository>, store as Arc<dyn VideoRepository>)
        } else {
            tracing::warn!("persistence disabled; data is kept in memory only");
            let store = Arc::new(InMemoryStore::new());
            (Arc::clone(&store) as Arc<dyn UserRepository>, store as Arc<dyn VideoRepository>)
        };

    // Broadcast hub and its intake task
    let (hub, intake) =
        BroadcastHub::with_compaction_interval(config.hub_intake_capacity, config.hub_compaction_interval);
    tokio::spawn(intake.run());

    // Build service layer
    let tokens = Arc::new(TokenService::new(
        config.access_token_secret.as_bytes(),
        config.access_token_ttl,
    ));
    let identity = Arc::new(GoogleIdentityProvider::new(config.google.clone()));
    let video_service = Arc::new(VideoService::new(videos, Arc::clone(&users), hub.clone()));
    let user_service = Arc::new(UserService::new(users, identity, Arc::clone(&tokens)));

    // Build application state
    let app_state = AppState {
        video_service,
        user_service,
        hub,
        tokens,
        ws: WsSettings {
            auth_timeout: config.ws_auth_timeout,
            outbox_capacity: config.ws_outbox_capacity,
        },
    };

    let app = api::build_app(app_state, api::cors_layer(config.frontend_url.as_deref()));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
