use crate::entities::OrderStatus;
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Staff-facing alert raised when a live list changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveNotification {
    NewOrder {
        order_id: i64,
        table_id: String,
        item_count: i64,
        total_cents: i64,
        formatted_total: String,
    },
    OrderStatusChanged {
        order_id: i64,
        table_id: String,
        previous: OrderStatus,
        current: OrderStatus,
    },
    WaiterCalled {
        call_id: i64,
        table_id: String,
        created_at: DateTime<Utc>,
    },
}

/// One message of a live subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LiveUpdate<T, S> {
    Snapshot {
        records: Vec<T>,
        summary: S,
        at: DateTime<Utc>,
    },
    Notification(LiveNotification),
    Heartbeat {
        at: DateTime<Utc>,
    },
}

impl<T: Serialize, S: Serialize> LiveUpdate<T, S> {
    pub fn event_name(&self) -> &'static str {
        match self {
            LiveUpdate::Snapshot { .. } => "snapshot",
            LiveUpdate::Notification(_) => "notification",
            LiveUpdate::Heartbeat { .. } => "heartbeat",
        }
    }

    /// Encodes the update as a Server-Sent Events frame.
    pub fn to_sse_frame(&self) -> AppResult<String> {
        let data = serde_json::to_string(self)?;
        Ok(format!("event: {}\ndata: {}\n\n", self.event_name(), data))
    }
}
