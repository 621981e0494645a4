use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum WaiterCallStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl WaiterCallStatus {
    pub fn can_transition_to(self, target: WaiterCallStatus) -> bool {
        matches!(
            (self, target),
            (WaiterCallStatus::Pending, WaiterCallStatus::Completed)
        )
    }
}

impl std::fmt::Display for WaiterCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaiterCallStatus::Pending => write!(f, "pending"),
            WaiterCallStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "waiter_calls")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub table_id: String,
    pub status: WaiterCallStatus,
    pub created_at: DateTime<Utc>,
    /// Set when staff marks the call completed; drives response-time analytics.
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
