use crate::entities::{WaiterCallStatus, waiter_call_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WaiterCallResponse {
    pub id: i64,
    pub table_id: String,
    pub status: WaiterCallStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<waiter_call_entity::Model> for WaiterCallResponse {
    fn from(m: waiter_call_entity::Model) -> Self {
        Self {
            id: m.id,
            table_id: m.table_id,
            status: m.status,
            created_at: m.created_at,
            completed_at: m.completed_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WaiterCallFilter {
    pub status: Option<WaiterCallStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateWaiterCallStatusRequest {
    pub status: WaiterCallStatus,
}
