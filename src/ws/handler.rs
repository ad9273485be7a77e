//! Axum WebSocket upgrade handler.

use std::net::SocketAddr;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::Response;

use super::admission::admit;
use crate::app_state::AppState;
use crate::error::ShareError;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// Credentials are not read from headers; the connection authenticates
/// in-band with its first message.
///
/// # Errors
///
/// Returns [`ShareError::Protocol`] (400) if the request is not a valid
/// WebSocket handshake. No connection task is spawned in that case.
pub async fn ws_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ShareError> {
    let upgrade = upgrade.map_err(|rejection| {
        tracing::debug!(%peer, error = %rejection, "rejected websocket handshake");
        ShareError::Protocol(rejection.body_text())
    })?;

    let source_addr = forwarded_for(&headers).unwrap_or_else(|| peer.to_string());

    Ok(upgrade
        .on_failed_upgrade(|e| tracing::warn!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| admit(socket, state, source_addr)))
}

/// First hop of `X-Forwarded-For`, if present.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}
