//! Observer registry for book updates
//!
//! Each subscriber owns a bounded channel. Publishing never blocks: a full
//! channel loses the update, a closed one is pruned.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::events::BookUpdate;

/// Opaque handle returned by [`Subscribers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
pub struct Subscribers {
    senders: DashMap<SubscriptionId, mpsc::Sender<BookUpdate>>,
    next_id: AtomicU64,
    capacity: usize,
    dropped: AtomicU64,
}

impl Subscribers {
    pub fn new(capacity: usize) -> Self {
        Self {
            senders: DashMap::new(),
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> (SubscriptionId, mpsc::Receiver<BookUpdate>) {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.capacity);
        self.senders.insert(id, tx);
        debug!(subscription = id.0, "Registered subscriber");
        (id, rx)
    }

    /// Remove a subscription. Unknown or already removed ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.senders.remove(&id).is_some();
        if removed {
            debug!(subscription = id.0, "Removed subscriber");
        }
        removed
    }

    /// Deliver `update` to every live subscriber without waiting
    pub fn publish(&self, update: &BookUpdate) {
        let mut closed = Vec::new();

        for entry in self.senders.iter() {
            match entry.value().try_send(update.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        subscription = entry.key().0,
                        symbol = %update.symbol,
                        "Subscriber lagging, dropped book update"
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(*entry.key()),
            }
        }

        // Removal happens after iteration; DashMap shards stay locked while iterating
        for id in closed {
            self.senders.remove(&id);
            debug!(subscription = id.0, "Pruned closed subscriber");
        }
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Updates lost to full channels since creation
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Subscribers {
    fn default() -> Self {
        Self::new(64)
    }
}
