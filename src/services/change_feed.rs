//! In-process change notifications.
//!
//! Every successful write to `orders` or `waiter_calls` publishes a
//! [`ChangeEvent`]; live subscriptions listen here to refresh immediately
//! instead of waiting for their next poll.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedTable {
    Orders,
    WaiterCalls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChangeEvent {
    pub table: FeedTable,
    pub kind: ChangeKind,
    pub record_id: i64,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Fire-and-forget; a write never fails because nobody is listening.
    pub fn publish(&self, table: FeedTable, kind: ChangeKind, record_id: i64) {
        let event = ChangeEvent {
            table,
            kind,
            record_id,
            at: Utc::now(),
        };
        match self.tx.send(event) {
            Ok(receivers) => log::debug!(
                "Change event {table:?}/{kind:?} #{record_id} -> {receivers} subscriber(s)"
            ),
            Err(_) => {
                log::debug!("Change event {table:?}/{kind:?} #{record_id} has no subscribers")
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
