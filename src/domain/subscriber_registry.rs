//! Insertion-ordered store of broadcast subscribers.
//!
//! [`SubscriberRegistry`] keeps every admitted subscriber in a `Vec`, in
//! registration order, behind a [`tokio::sync::RwLock`]. Appends and
//! compaction take the write lock and are performed only by the hub's intake
//! loop. Broadcasts take the read lock just long enough to copy a snapshot of
//! the live entries, then deliver without holding it.
//!
//! A subscriber whose connection is observed closed is tombstoned in place
//! (an atomic flag, so the dispatcher never needs the write lock). Tombstoned
//! entries stay counted by [`SubscriberRegistry::len`] until the next
//! [`SubscriberRegistry::compact`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::subscriber::{Subscriber, SubscriberId};

#[derive(Debug)]
struct Slot {
    id: SubscriberId,
    subscriber: Arc<Subscriber>,
    alive: AtomicBool,
}

#[derive(Debug, Default)]
struct Slots {
    entries: Vec<Slot>,
    next_id: u64,
}

/// A live registry entry as seen by a broadcast snapshot.
#[derive(Debug, Clone)]
pub struct RegisteredSubscriber {
    /// Registry-assigned id.
    pub id: SubscriberId,
    /// The subscriber itself.
    pub subscriber: Arc<Subscriber>,
}

/// Ordered subscriber store with tombstoning and compaction.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    slots: RwLock<Slots>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber at the back, returning its new id.
    pub async fn append(&self, subscriber: Subscriber) -> SubscriberId {
        let mut slots = self.slots.write().await;
        let id = SubscriberId::new(slots.next_id);
        slots.next_id = slots.next_id.saturating_add(1);
        slots.entries.push(Slot {
            id,
            subscriber: Arc::new(subscriber),
            alive: AtomicBool::new(true),
        });
        id
    }

    /// Returns the live entries, front to back.
    pub async fn snapshot(&self) -> Vec<RegisteredSubscriber> {
        let slots = self.slots.read().await;
        slots
            .entries
            .iter()
            .filter(|slot| slot.alive.load(Ordering::Acquire))
            .map(|slot| RegisteredSubscriber {
                id: slot.id,
                subscriber: Arc::clone(&slot.subscriber),
            })
            .collect()
    }

    /// Tombstones the entry with the given id.
    ///
    /// Returns `true` if a live entry was found and marked dead. Ids are
    /// assigned in increasing order, so the lookup is a binary search.
    pub async fn mark_dead(&self, id: SubscriberId) -> bool {
        let slots = self.slots.read().await;
        match slots.entries.binary_search_by_key(&id, |slot| slot.id) {
            Ok(pos) => slots
                .entries
                .get(pos)
                .is_some_and(|slot| slot.alive.swap(false, Ordering::AcqRel)),
            Err(_) => false,
        }
    }

    /// Drops every tombstoned entry, preserving the order of the rest.
    ///
    /// Returns the number of entries removed.
    pub async fn compact(&self) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.entries.len();
        slots
            .entries
            .retain(|slot| slot.alive.load(Ordering::Acquire));
        before - slots.entries.len()
    }

    /// Number of entries, live or tombstoned.
    pub async fn len(&self) -> usize {
        self.slots.read().await.entries.len()
    }

    /// Returns `true` if the registry holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.entries.is_empty()
    }

    /// Number of entries not yet tombstoned.
    pub async fn live_count(&self) -> usize {
        let slots = self.slots.read().await;
        slots
            .entries
            .iter()
            .filter(|slot| slot.alive.load(Ordering::Acquire))
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn detached(uid: u64) -> Subscriber {
        Subscriber::detached(UserId::new(uid), format!("10.0.0.{uid}:4000"))
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let registry = SubscriberRegistry::new();
        for uid in [5, 3, 9, 3] {
            registry.append(detached(uid)).await;
        }

        let order: Vec<u64> = registry
            .snapshot()
            .await
            .iter()
            .map(|e| e.subscriber.user_id.get())
            .collect();
        assert_eq!(order, vec![5, 3, 9, 3]);
        assert_eq!(registry.len().await, 4);
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let registry = SubscriberRegistry::new();
        let a = registry.append(detached(1)).await;
        let b = registry.append(detached(1)).await;
        assert!(a < b);
    }

    #[tokio::test]
    async fn mark_dead_hides_entry_but_keeps_slot() {
        let registry = SubscriberRegistry::new();
        let a = registry.append(detached(1)).await;
        let _b = registry.append(detached(2)).await;

        assert!(registry.mark_dead(a).await);
        assert!(!registry.mark_dead(a).await);

        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.live_count().await, 1);
        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.first().map(|e| e.subscriber.user_id),
            Some(UserId::new(2))
        );
    }

    #[tokio::test]
    async fn mark_dead_unknown_id_is_noop() {
        let registry = SubscriberRegistry::new();
        registry.append(detached(1)).await;
        assert!(!registry.mark_dead(SubscriberId::new(99)).await);
        assert_eq!(registry.live_count().await, 1);
    }

    #[tokio::test]
    async fn compact_removes_only_tombstones() {
        let registry = SubscriberRegistry::new();
        let a = registry.append(detached(1)).await;
        registry.append(detached(2)).await;
        let c = registry.append(detached(3)).await;
        registry.append(detached(4)).await;

        registry.mark_dead(a).await;
        registry.mark_dead(c).await;
        assert_eq!(registry.compact().await, 2);
        assert_eq!(registry.len().await, 2);

        let order: Vec<u64> = registry
            .snapshot()
            .await
            .iter()
            .map(|e| e.subscriber.user_id.get())
            .collect();
        assert_eq!(order, vec![2, 4]);
    }

    #[tokio::test]
    async fn ids_keep_increasing_after_compaction() {
        let registry = SubscriberRegistry::new();
        let a = registry.append(detached(1)).await;
        registry.mark_dead(a).await;
        registry.compact().await;
        assert!(registry.is_empty().await);

        let b = registry.append(detached(2)).await;
        assert!(b > a);
        assert!(registry.mark_dead(b).await);
    }
}
