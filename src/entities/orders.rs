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
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "preparing")]
    Preparing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Targets reachable through an explicit status update.
    /// Completed and cancelled orders are terminal.
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Completed, OrderStatus::Cancelled],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Dashboard quick-toggle: pending -> preparing -> completed -> pending,
    /// cancelled orders are reopened as pending.
    pub fn next_in_cycle(self) -> OrderStatus {
        match self {
            OrderStatus::Pending => OrderStatus::Preparing,
            OrderStatus::Preparing => OrderStatus::Completed,
            OrderStatus::Completed | OrderStatus::Cancelled => OrderStatus::Pending,
        }
    }

    /// Pending and preparing orders keep a table "active".
    pub fn is_active(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Preparing => write!(f, "preparing"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

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
pub enum PaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl PaymentStatus {
    /// unpaid -> paid -> refunded -> unpaid
    pub fn next_in_cycle(self) -> PaymentStatus {
        match self {
            PaymentStatus::Unpaid => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Refunded,
            PaymentStatus::Refunded => PaymentStatus::Unpaid,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// Line items are stored as a JSON array of `models::OrderItem`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub table_id: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_cents: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses_have_no_transitions() {
        assert!(OrderStatus::Completed.allowed_transitions().is_empty());
        assert!(OrderStatus::Cancelled.allowed_transitions().is_empty());
    }

    #[test]
    fn test_active_orders_can_be_cancelled() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_status_cycle_reopens_finished_orders() {
        assert_eq!(OrderStatus::Pending.next_in_cycle(), OrderStatus::Preparing);
        assert_eq!(OrderStatus::Preparing.next_in_cycle(), OrderStatus::Completed);
        assert_eq!(OrderStatus::Completed.next_in_cycle(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Cancelled.next_in_cycle(), OrderStatus::Pending);
    }

    #[test]
    fn test_payment_cycle() {
        assert_eq!(PaymentStatus::Unpaid.next_in_cycle(), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::Paid.next_in_cycle(), PaymentStatus::Refunded);
        assert_eq!(PaymentStatus::Refunded.next_in_cycle(), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let v = serde_json::to_value(OrderStatus::Preparing).unwrap();
        assert_eq!(v, serde_json::json!("preparing"));
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
    }
}
