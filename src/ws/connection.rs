//! Read/write loop of an admitted subscriber connection.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::Notification;

/// Forwards queued notifications to the peer until it disconnects.
///
/// - Writes each notification from `outbox` as one text frame.
/// - Ignores inbound frames other than close.
///
/// Returning drops `outbox`, so the next broadcast sees the subscriber as
/// disconnected and tombstones it.
pub async fn run_connection(socket: WebSocket, mut outbox: mpsc::Receiver<Notification>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "ws read failed");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            notification = outbox.recv() => {
                let Some(text) = notification else {
                    break;
                };
                if let Err(e) = ws_tx.send(Message::Text(text)).await {
                    tracing::debug!(error = %e, "ws write failed");
                    break;
                }
            }
        }
    }

    outbox.close();
}
