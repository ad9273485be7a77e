//! Real-time fan-out of newly shared videos.
//!
//! [`BroadcastHub`] owns the three pieces of the notification path:
//!
//! - the **intake channel**, a bounded `mpsc` queue through which admitted
//!   connections are submitted ([`BroadcastHub::submit`]);
//! - the [`SubscriberRegistry`], appended to only by the [`IntakeLoop`];
//! - the **dispatcher** ([`BroadcastHub::broadcast`]), which pushes one
//!   serialized payload to every live subscriber except the originator.
//!
//! The hub is built once in `main` and shared through the application state.
//! [`BroadcastHub::new`] returns the hub together with its [`IntakeLoop`],
//! which must be spawned for submissions to make progress.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use super::UserId;
use super::subscriber::{DeliveryError, Notification, Subscriber};
use super::subscriber_registry::SubscriberRegistry;

/// Default capacity of the intake channel.
pub const DEFAULT_INTAKE_CAPACITY: usize = 100;

/// Default period between registry compactions.
pub const DEFAULT_COMPACTION_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest accepted compaction period.
pub const MIN_COMPACTION_INTERVAL: Duration = Duration::from_millis(1);

/// Errors surfaced by the hub itself. Per-subscriber failures are
/// [`DeliveryError`]s and never escape a broadcast.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The intake loop has stopped; no more subscribers can be admitted.
    #[error("broadcast hub intake is closed")]
    Closed,

    /// The payload could not be serialized to JSON.
    #[error("failed to serialize notification: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome counters of a single broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers that had the notification queued.
    pub delivered: usize,
    /// Subscribers skipped: the originator, or entries without a connection.
    pub skipped: usize,
    /// Subscribers whose delivery failed.
    pub failed: usize,
}

/// Shared handle to the subscriber registry, intake channel and dispatcher.
///
/// Cheap to clone; all clones refer to the same registry.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    registry: Arc<SubscriberRegistry>,
    intake: mpsc::Sender<Subscriber>,
}

/// The single task that drains the intake channel into the registry.
///
/// It is the only writer that appends to the registry and also runs the
/// periodic compaction of tombstoned entries. It exits once every
/// [`BroadcastHub`] clone has been dropped.
#[derive(Debug)]
pub struct IntakeLoop {
    registry: Arc<SubscriberRegistry>,
    receiver: mpsc::Receiver<Subscriber>,
    compaction_interval: Duration,
}

impl BroadcastHub {
    /// Creates a hub whose intake channel holds at most `intake_capacity`
    /// pending subscribers.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(intake_capacity: usize) -> (Self, IntakeLoop) {
        Self::with_compaction_interval(intake_capacity, DEFAULT_COMPACTION_INTERVAL)
    }

    /// Like [`BroadcastHub::new`] with an explicit compaction period.
    ///
    /// A zero period is raised to [`MIN_COMPACTION_INTERVAL`].
    #[must_use]
    pub fn with_compaction_interval(
        intake_capacity: usize,
        compaction_interval: Duration,
    ) -> (Self, IntakeLoop) {
        let (intake, receiver) = mpsc::channel(intake_capacity.max(1));
        let registry = Arc::new(SubscriberRegistry::new());
        let hub = Self {
            registry: Arc::clone(&registry),
            intake,
        };
        let intake_loop = IntakeLoop {
            registry,
            receiver,
            compaction_interval: compaction_interval.max(MIN_COMPACTION_INTERVAL),
        };
        (hub, intake_loop)
    }

    /// Submits an admitted subscriber for registration.
    ///
    /// Waits while the intake channel is full; the subscriber is never
    /// dropped while the intake loop is running.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Closed`] if the intake loop has stopped.
    pub async fn submit(&self, subscriber: Subscriber) -> Result<(), HubError> {
        self.intake
            .send(subscriber)
            .await
            .map_err(|_| HubError::Closed)
    }

    /// Serializes `payload` once and pushes it to every live subscriber
    /// except those owned by `origin`.
    ///
    /// Per-subscriber failures are logged and counted in the report; they
    /// never fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Serialize`] if `payload` cannot be encoded.
    pub async fn broadcast<T>(&self, payload: &T, origin: UserId) -> Result<BroadcastReport, HubError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(payload)?;
        Ok(self.dispatch(Notification::from(json), origin).await)
    }

    /// Pushes an already serialized notification to every live subscriber
    /// except those owned by `origin`, front to back.
    pub async fn dispatch(&self, notification: Notification, origin: UserId) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for entry in self.registry.snapshot().await {
            let subscriber = &entry.subscriber;
            if subscriber.user_id == origin || !subscriber.is_streaming() {
                report.skipped += 1;
                continue;
            }

            match subscriber.deliver(&notification) {
                Ok(()) => report.delivered += 1,
                Err(DeliveryError::Disconnected) => {
                    report.failed += 1;
                    self.registry.mark_dead(entry.id).await;
                    tracing::debug!(
                        subscriber = %entry.id,
                        user_id = %subscriber.user_id,
                        addr = %subscriber.source_addr,
                        "subscriber disconnected; tombstoned"
                    );
                }
                Err(DeliveryError::Lagging) => {
                    report.failed += 1;
                    tracing::warn!(
                        subscriber = %entry.id,
                        user_id = %subscriber.user_id,
                        addr = %subscriber.source_addr,
                        "subscriber outbox full; notification dropped"
                    );
                }
            }
        }

        report
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Number of registry entries, including tombstoned ones.
    pub async fn subscriber_count(&self) -> usize {
        self.registry.len().await
    }

    /// Number of registry entries still considered live.
    pub async fn live_subscriber_count(&self) -> usize {
        self.registry.live_count().await
    }
}

impl IntakeLoop {
    /// Drains the intake channel until every hub handle is dropped.
    pub async fn run(mut self) {
        let mut compaction = tokio::time::interval_at(
            Instant::now() + self.compaction_interval,
            self.compaction_interval,
        );
        compaction.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                next = self.receiver.recv() => {
                    let Some(subscriber) = next else {
                        break;
                    };
                    let user_id = subscriber.user_id;
                    let id = self.registry.append(subscriber).await;
                    tracing::debug!(subscriber = %id, %user_id, "subscriber registered");
                }
                _ = compaction.tick() => {
                    let removed = self.registry.compact().await;
                    if removed > 0 {
                        tracing::debug!(removed, "compacted subscriber registry");
                    }
                }
            }
        }

        tracing::info!("broadcast hub intake closed");
    }
}
