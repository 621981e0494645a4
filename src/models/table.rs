use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TableSummary {
    pub table_id: String,
    /// Public URL encoded in the table's QR code
    pub url: String,
    pub menu_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableView {
    pub table_id: String,
    pub restaurant_name: String,
    pub active_orders: u64,
    pub menu_path: String,
    pub orders_path: String,
    pub waiter_call_path: String,
}
