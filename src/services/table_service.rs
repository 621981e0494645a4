use crate::error::AppResult;
use crate::models::*;
use crate::services::{OrderService, QrService};
use crate::utils::validate_table_id;

#[derive(Clone)]
pub struct TableService {
    order_service: OrderService,
    qr_service: QrService,
    restaurant_name: String,
    table_count: u32,
}

impl TableService {
    pub fn new(
        order_service: OrderService,
        qr_service: QrService,
        restaurant_name: impl Into<String>,
        table_count: u32,
    ) -> Self {
        Self {
            order_service,
            qr_service,
            restaurant_name: restaurant_name.into(),
            table_count,
        }
    }

    pub fn list_tables(&self) -> Vec<TableSummary> {
        (1..=self.table_count)
            .map(|n| {
                let table_id = n.to_string();
                TableSummary {
                    url: self.qr_service.table_url(&table_id),
                    menu_path: menu_path(&table_id),
                    table_id,
                }
            })
            .collect()
    }

    pub async fn table_view(&self, table_id: &str) -> AppResult<TableView> {
        let table_id = validate_table_id(table_id)?;
        let active_orders = self.order_service.count_active_for_table(&table_id).await?;
        Ok(TableView {
            restaurant_name: self.restaurant_name.clone(),
            active_orders,
            menu_path: menu_path(&table_id),
            orders_path: format!("/api/v1/tables/{table_id}/orders"),
            waiter_call_path: format!("/api/v1/tables/{table_id}/waiter-calls"),
            table_id,
        })
    }
}

fn menu_path(table_id: &str) -> String {
    format!("/api/v1/tables/{table_id}/menu")
}
