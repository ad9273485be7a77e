//! In-band authentication of a freshly upgraded connection.
//!
//! The client's first message must be `Bearer <token>`. A connection that
//! fails to authenticate, for any reason, gets an empty close frame and
//! nothing else. One that succeeds becomes a [`Subscriber`] and is handed
//! to the broadcast hub.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use tokio::sync::mpsc;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::auth::{AuthError, AuthUser, TokenService};
use crate::domain::Subscriber;

/// Authenticates `socket`, registers it with the hub, then serves it until
/// the peer goes away.
pub async fn admit(mut socket: WebSocket, state: AppState, source_addr: String) {
    let user = match authenticate(&mut socket, &state.tokens, state.ws.auth_timeout).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(%source_addr, error = %e, "websocket authentication failed");
            close(socket).await;
            return;
        }
    };

    let (outbox_tx, outbox_rx) = mpsc::channel(state.ws.outbox_capacity.max(1));
    let subscriber = Subscriber::new(user.user_id, source_addr.as_str(), outbox_tx);

    if let Err(e) = state.hub.submit(subscriber).await {
        tracing::warn!(%source_addr, user_id = %user.user_id, error = %e, "subscriber not admitted");
        close(socket).await;
        return;
    }

    tracing::info!(%source_addr, user_id = %user.user_id, "subscriber admitted");
    run_connection(socket, outbox_rx).await;
    tracing::debug!(%source_addr, user_id = %user.user_id, "subscriber disconnected");
}

async fn authenticate(
    socket: &mut WebSocket,
    tokens: &TokenService,
    wait: Duration,
) -> Result<AuthUser, AuthError> {
    let credential = tokio::time::timeout(wait, read_credential(socket))
        .await
        .map_err(|_| AuthError::Timeout)??;
    tokens.authenticate(&credential)
}

/// Reads the first data frame. Control frames are skipped.
async fn read_credential(socket: &mut WebSocket) -> Result<String, AuthError> {
    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
            Some(Ok(Message::Binary(bytes))) => {
                return std::str::from_utf8(&bytes)
                    .map(str::to_owned)
                    .map_err(|_| AuthError::InvalidScheme);
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            Some(Ok(Message::Close(_)) | Err(_)) | None => return Err(AuthError::PeerClosed),
        }
    }
}

async fn close(mut socket: WebSocket) {
    if let Err(e) = socket.send(Message::Close(None)).await {
        tracing::debug!(error = %e, "close frame not sent");
    }
}
