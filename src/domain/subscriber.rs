//! Broadcast subscribers and their delivery handles.

use std::fmt;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::UserId;

/// A serialized notification, shared by every delivery of one broadcast.
///
/// Cloning only bumps a reference count; the JSON is produced once.
pub type Notification = Utf8Bytes;

/// Registry-assigned subscriber identifier. Monotonically increasing in
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Wraps a raw registry sequence number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Why a notification could not be handed to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The connection task has exited; the peer is gone.
    #[error("subscriber disconnected")]
    Disconnected,

    /// The subscriber's outbox is full; the peer is not keeping up.
    #[error("subscriber outbox full")]
    Lagging,
}

/// An authenticated connection waiting for notifications.
///
/// The outbox is the sending half of a bounded queue drained by the
/// connection's own writer loop. It is `None` for subscribers that are not
/// backed by a live streaming connection; those are never written to.
#[derive(Debug, Clone)]
pub struct Subscriber {
    /// Owner of the connection.
    pub user_id: UserId,
    /// Peer address, for diagnostics only.
    pub source_addr: String,
    outbox: Option<mpsc::Sender<Notification>>,
}

impl Subscriber {
    /// Creates a subscriber backed by a live connection outbox.
    #[must_use]
    pub fn new(
        user_id: UserId,
        source_addr: impl Into<String>,
        outbox: mpsc::Sender<Notification>,
    ) -> Self {
        Self {
            user_id,
            source_addr: source_addr.into(),
            outbox: Some(outbox),
        }
    }

    /// Creates a subscriber with no live connection.
    #[must_use]
    pub fn detached(user_id: UserId, source_addr: impl Into<String>) -> Self {
        Self {
            user_id,
            source_addr: source_addr.into(),
            outbox: None,
        }
    }

    /// Returns `true` if this subscriber has a connection to write to.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.outbox.is_some()
    }

    /// Queues `notification` for the connection without waiting.
    ///
    /// A subscriber without an outbox accepts and discards the notification.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Disconnected`] if the connection task has
    /// dropped its receiver and [`DeliveryError::Lagging`] if the outbox is
    /// full.
    pub fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let Some(outbox) = &self.outbox else {
            return Ok(());
        };
        outbox
            .try_send(notification.clone())
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::Lagging,
                TrySendError::Closed(_) => DeliveryError::Disconnected,
            })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deliver_queues_shared_payload() {
        let (tx, mut rx) = mpsc::channel(4);
        let sub = Subscriber::new(UserId::new(1), "127.0.0.1:5000", tx);
        let note = Notification::from("{\"id\":1}".to_string());

        assert_eq!(sub.deliver(&note), Ok(()));
        let Some(received) = rx.recv().await else {
            panic!("expected a queued notification");
        };
        assert_eq!(received.as_str(), "{\"id\":1}");
    }

    #[test]
    fn deliver_reports_disconnected_peer() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let sub = Subscriber::new(UserId::new(1), "127.0.0.1:5000", tx);
        let note = Notification::from("x".to_string());
        assert_eq!(sub.deliver(&note), Err(DeliveryError::Disconnected));
    }

    #[test]
    fn deliver_reports_full_outbox() {
        let (tx, _rx) = mpsc::channel(1);
        let sub = Subscriber::new(UserId::new(1), "127.0.0.1:5000", tx);
        let note = Notification::from("x".to_string());
        assert_eq!(sub.deliver(&note), Ok(()));
        assert_eq!(sub.deliver(&note), Err(DeliveryError::Lagging));
    }

    #[test]
    fn detached_subscriber_swallows_notifications() {
        let sub = Subscriber::detached(UserId::new(9), "10.0.0.1:1");
        assert!(!sub.is_streaming());
        assert_eq!(sub.deliver(&Notification::from("x".to_string())), Ok(()));
    }
}
