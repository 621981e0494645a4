use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TableMetrics {
    pub table_id: String,
    pub order_count: u64,
    /// Paid orders only
    pub total_spent_cents: i64,
    /// Paid total spread over every order of the table
    pub average_order_value_cents: i64,
    pub waiter_call_count: u64,
    /// Minutes, completed calls only
    pub average_response_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WaiterMetrics {
    pub completed_calls: u64,
    pub average_response_minutes: f64,
    pub fastest_response_minutes: i64,
    pub slowest_response_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderMetrics {
    pub total_orders: u64,
    pub total_revenue_cents: i64,
    pub average_order_value_cents: i64,
    pub most_ordered_products: Vec<ProductCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyRevenue {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardMetrics {
    pub most_used_tables: Vec<TableMetrics>,
    pub highest_spending_tables: Vec<TableMetrics>,
    pub best_waiter_response_tables: Vec<TableMetrics>,
    pub waiter_metrics: WaiterMetrics,
    pub order_metrics: OrderMetrics,
    pub daily_revenue: Vec<DailyRevenue>,
}

/// Headline counters derived from an order list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    pub todays_sales_cents: i64,
    pub active_tables: u64,
    pub active_orders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WaiterCallSummary {
    pub pending_calls: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub todays_sales_cents: i64,
    pub active_tables: u64,
    pub active_orders: u64,
    pub pending_waiter_calls: u64,
}
