//! Dashboard rollups.
//!
//! Everything here is recomputed from the full order and waiter-call lists on
//! each request; nothing is cached or stored.

use crate::entities::{PaymentStatus, WaiterCallStatus};
use crate::error::AppResult;
use crate::models::*;
use crate::services::{OrderService, WaiterCallService};
use crate::utils::average_cents;
use chrono::{NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

const TOP_N: usize = 5;

#[derive(Clone)]
pub struct AnalyticsService {
    order_service: OrderService,
    waiter_call_service: WaiterCallService,
}

impl AnalyticsService {
    pub fn new(order_service: OrderService, waiter_call_service: WaiterCallService) -> Self {
        Self {
            order_service,
            waiter_call_service,
        }
    }

    pub async fn dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let (orders, calls) = self.fetch_all().await?;
        Ok(build_dashboard_metrics(&orders, &calls))
    }

    pub async fn dashboard_summary(&self) -> AppResult<DashboardSummary> {
        let (orders, calls) = self.fetch_all().await?;
        let today = Utc::now().date_naive();
        let orders_summary = summarize_orders(&orders, today);
        Ok(DashboardSummary {
            todays_sales_cents: orders_summary.todays_sales_cents,
            active_tables: orders_summary.active_tables,
            active_orders: orders_summary.active_orders,
            pending_waiter_calls: summarize_calls(&calls).pending_calls,
        })
    }

    async fn fetch_all(&self) -> AppResult<(Vec<OrderResponse>, Vec<WaiterCallResponse>)> {
        let order_filter = OrderFilter::default();
        let call_filter = WaiterCallFilter::default();
        let (orders, calls) = tokio::join!(
            self.order_service.list_orders(&order_filter),
            self.waiter_call_service.list_calls(&call_filter),
        );
        Ok((orders?, calls?))
    }
}

/// Whole minutes from request to completion; `None` unless the call is completed.
pub fn response_minutes(call: &WaiterCallResponse) -> Option<i64> {
    if call.status != WaiterCallStatus::Completed {
        return None;
    }
    call.completed_at
        .map(|done| (done - call.created_at).num_minutes().max(0))
}

fn is_paid(order: &OrderResponse) -> bool {
    order.payment_status == PaymentStatus::Paid
}

fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<i64>() as f64 / values.len() as f64)
}

#[derive(Default)]
struct TableAcc {
    order_count: u64,
    total_spent_cents: i64,
    waiter_call_count: u64,
    response_minutes: Vec<i64>,
}

/// Per-table rollup, sorted by table id.
pub fn calculate_table_metrics(
    orders: &[OrderResponse],
    calls: &[WaiterCallResponse],
) -> Vec<TableMetrics> {
    let mut tables: BTreeMap<&str, TableAcc> = BTreeMap::new();

    for order in orders {
        let acc = tables.entry(order.table_id.as_str()).or_default();
        acc.order_count += 1;
        if is_paid(order) {
            acc.total_spent_cents += order.total_cents;
        }
    }

    for call in calls {
        let acc = tables.entry(call.table_id.as_str()).or_default();
        acc.waiter_call_count += 1;
        if let Some(minutes) = response_minutes(call) {
            acc.response_minutes.push(minutes);
        }
    }

    tables
        .into_iter()
        .map(|(table_id, acc)| TableMetrics {
            table_id: table_id.to_string(),
            order_count: acc.order_count,
            total_spent_cents: acc.total_spent_cents,
            average_order_value_cents: average_cents(
                acc.total_spent_cents,
                acc.order_count.max(1) as usize,
            ),
            waiter_call_count: acc.waiter_call_count,
            average_response_minutes: mean(&acc.response_minutes),
        })
        .collect()
}

pub fn calculate_waiter_metrics(calls: &[WaiterCallResponse]) -> WaiterMetrics {
    let completed_calls = calls
        .iter()
        .filter(|c| c.status == WaiterCallStatus::Completed)
        .count() as u64;
    let times: Vec<i64> = calls.iter().filter_map(response_minutes).collect();

    WaiterMetrics {
        completed_calls,
        average_response_minutes: mean(&times).unwrap_or(0.0),
        fastest_response_minutes: times.iter().copied().min().unwrap_or(0),
        slowest_response_minutes: times.iter().copied().max().unwrap_or(0),
    }
}

pub fn calculate_order_metrics(orders: &[OrderResponse]) -> OrderMetrics {
    let paid: Vec<&OrderResponse> = orders.iter().filter(|o| is_paid(o)).collect();
    let total_revenue_cents: i64 = paid.iter().map(|o| o.total_cents).sum();

    let mut counts: HashMap<&str, i64> = HashMap::new();
    for order in orders {
        for item in &order.items {
            *counts.entry(item.name.as_str()).or_insert(0) += i64::from(item.quantity);
        }
    }
    let mut most_ordered_products: Vec<ProductCount> = counts
        .into_iter()
        .map(|(name, count)| ProductCount {
            name: name.to_string(),
            count,
        })
        .collect();
    most_ordered_products.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    most_ordered_products.truncate(TOP_N);

    OrderMetrics {
        total_orders: orders.len() as u64,
        total_revenue_cents,
        average_order_value_cents: average_cents(total_revenue_cents, paid.len()),
        most_ordered_products,
    }
}

/// Paid revenue per UTC day, oldest first.
pub fn calculate_daily_revenue(orders: &[OrderResponse]) -> Vec<DailyRevenue> {
    let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for order in orders.iter().filter(|o| is_paid(o)) {
        *by_day.entry(order.created_at.date_naive()).or_insert(0) += order.total_cents;
    }
    by_day
        .into_iter()
        .map(|(date, revenue_cents)| DailyRevenue {
            date,
            revenue_cents,
        })
        .collect()
}

pub fn build_dashboard_metrics(
    orders: &[OrderResponse],
    calls: &[WaiterCallResponse],
) -> DashboardMetrics {
    let tables = calculate_table_metrics(orders, calls);

    let mut most_used_tables = tables.clone();
    most_used_tables.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.table_id.cmp(&b.table_id))
    });
    most_used_tables.truncate(TOP_N);

    let mut highest_spending_tables = tables.clone();
    highest_spending_tables.sort_by(|a, b| {
        b.total_spent_cents
            .cmp(&a.total_spent_cents)
            .then_with(|| a.table_id.cmp(&b.table_id))
    });
    highest_spending_tables.truncate(TOP_N);

    let mut best_waiter_response_tables: Vec<TableMetrics> = tables
        .into_iter()
        .filter(|t| t.average_response_minutes.is_some())
        .collect();
    best_waiter_response_tables.sort_by(|a, b| {
        let lhs = a.average_response_minutes.unwrap_or(0.0);
        let rhs = b.average_response_minutes.unwrap_or(0.0);
        lhs.partial_cmp(&rhs)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.table_id.cmp(&b.table_id))
    });
    best_waiter_response_tables.truncate(TOP_N);

    DashboardMetrics {
        most_used_tables,
        highest_spending_tables,
        best_waiter_response_tables,
        waiter_metrics: calculate_waiter_metrics(calls),
        order_metrics: calculate_order_metrics(orders),
        daily_revenue: calculate_daily_revenue(orders),
    }
}

/// Today's paid sales plus active tables/orders (pending or preparing).
pub fn summarize_orders(orders: &[OrderResponse], today: NaiveDate) -> OrderSummary {
    let todays_sales_cents = orders
        .iter()
        .filter(|o| is_paid(o) && o.created_at.date_naive() == today)
        .map(|o| o.total_cents)
        .sum();
    let active: Vec<&OrderResponse> = orders.iter().filter(|o| o.status.is_active()).collect();
    let active_tables: HashSet<&str> = active.iter().map(|o| o.table_id.as_str()).collect();

    OrderSummary {
        todays_sales_cents,
        active_tables: active_tables.len() as u64,
        active_orders: active.len() as u64,
    }
}

pub fn summarize_calls(calls: &[WaiterCallResponse]) -> WaiterCallSummary {
    WaiterCallSummary {
        pending_calls: calls
            .iter()
            .filter(|c| c.status == WaiterCallStatus::Pending)
            .count() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OrderStatus;
    use chrono::{DateTime, Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn order(
        id: i64,
        table: &str,
        status: OrderStatus,
        payment: PaymentStatus,
        created_at: DateTime<Utc>,
        items: &[(&str, i32, i64)],
    ) -> OrderResponse {
        let items: Vec<OrderItem> = items
            .iter()
            .enumerate()
            .map(|(i, (name, quantity, price_cents))| OrderItem {
                product_id: i as i64 + 1,
                name: name.to_string(),
                quantity: *quantity,
                price_cents: *price_cents,
            })
            .collect();
        OrderResponse {
            id,
            table_id: table.into(),
            status,
            payment_status: payment,
            total_cents: items.iter().map(OrderItem::line_total_cents).sum(),
            items,
            created_at,
            updated_at: created_at,
            available_actions: status.allowed_transitions().to_vec(),
        }
    }

    fn call(
        id: i64,
        table: &str,
        created_at: DateTime<Utc>,
        minutes: Option<i64>,
    ) -> WaiterCallResponse {
        WaiterCallResponse {
            id,
            table_id: table.into(),
            status: if minutes.is_some() {
                WaiterCallStatus::Completed
            } else {
                WaiterCallStatus::Pending
            },
            created_at,
            completed_at: minutes.map(|m| created_at + Duration::minutes(m)),
        }
    }

    fn fixture() -> (Vec<OrderResponse>, Vec<WaiterCallResponse>) {
        use OrderStatus::*;
        use PaymentStatus::*;
        let orders = vec![
            order(1, "1", Completed, Paid, at(1, 12), &[("Dumplings", 2, 850)]),
            order(2, "1", Preparing, Unpaid, at(1, 13), &[("Tea", 1, 350)]),
            order(3, "2", Completed, Paid, at(2, 19), &[("Dumplings", 1, 850), ("Tea", 2, 350)]),
            order(4, "3", Cancelled, Refunded, at(2, 20), &[("Mapo Tofu", 1, 1350)]),
            order(5, "1", Pending, Unpaid, at(3, 11), &[("Tea", 3, 350)]),
        ];
        let calls = vec![
            call(1, "1", at(1, 12), Some(4)),
            call(2, "1", at(1, 14), Some(8)),
            call(3, "2", at(2, 19), Some(3)),
            call(4, "4", at(3, 9), None),
        ];
        (orders, calls)
    }

    #[test]
    fn test_table_metrics() {
        let (orders, calls) = fixture();
        let tables = calculate_table_metrics(&orders, &calls);
        let ids: Vec<&str> = tables.iter().map(|t| t.table_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        let t1 = &tables[0];
        assert_eq!(t1.order_count, 3);
        assert_eq!(t1.total_spent_cents, 1700);
        // paid total over all orders of the table
        assert_eq!(t1.average_order_value_cents, 567);
        assert_eq!(t1.waiter_call_count, 2);
        assert_eq!(t1.average_response_minutes, Some(6.0));

        let t3 = &tables[2];
        assert_eq!(t3.total_spent_cents, 0);
        assert_eq!(t3.average_response_minutes, None);

        let t4 = &tables[3];
        assert_eq!(t4.order_count, 0);
        assert_eq!(t4.average_order_value_cents, 0);
        assert_eq!(t4.waiter_call_count, 1);
    }

    #[test]
    fn test_waiter_metrics() {
        let (_, calls) = fixture();
        let metrics = calculate_waiter_metrics(&calls);
        assert_eq!(metrics.completed_calls, 3);
        assert_eq!(metrics.average_response_minutes, 5.0);
        assert_eq!(metrics.fastest_response_minutes, 3);
        assert_eq!(metrics.slowest_response_minutes, 8);

        let empty = calculate_waiter_metrics(&[]);
        assert_eq!(empty.completed_calls, 0);
        assert_eq!(empty.average_response_minutes, 0.0);
        assert_eq!(empty.fastest_response_minutes, 0);
    }

    #[test]
    fn test_order_metrics() {
        let (orders, _) = fixture();
        let metrics = calculate_order_metrics(&orders);
        assert_eq!(metrics.total_orders, 5);
        assert_eq!(metrics.total_revenue_cents, 1700 + 1550);
        assert_eq!(metrics.average_order_value_cents, 1625);
        assert_eq!(
            metrics.most_ordered_products,
            vec![
                ProductCount { name: "Tea".into(), count: 6 },
                ProductCount { name: "Dumplings".into(), count: 3 },
                ProductCount { name: "Mapo Tofu".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_daily_revenue_sorted_and_paid_only() {
        let (orders, _) = fixture();
        let daily = calculate_daily_revenue(&orders);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(daily[0].revenue_cents, 1700);
        assert_eq!(daily[1].revenue_cents, 1550);
    }

    #[test]
    fn test_dashboard_rankings() {
        let (orders, calls) = fixture();
        let metrics = build_dashboard_metrics(&orders, &calls);

        assert_eq!(metrics.most_used_tables[0].table_id, "1");
        // ties on one order break by table id
        assert_eq!(metrics.most_used_tables[1].table_id, "2");
        assert_eq!(metrics.most_used_tables[2].table_id, "3");

        assert_eq!(metrics.highest_spending_tables[0].table_id, "1");
        assert_eq!(metrics.highest_spending_tables[1].table_id, "2");

        let best: Vec<&str> = metrics
            .best_waiter_response_tables
            .iter()
            .map(|t| t.table_id.as_str())
            .collect();
        assert_eq!(best, vec!["2", "1"]);
    }

    #[test]
    fn test_rankings_keep_top_five() {
        let orders: Vec<OrderResponse> = (1..=7)
            .map(|i| {
                order(
                    i,
                    &format!("t{i}"),
                    OrderStatus::Completed,
                    PaymentStatus::Paid,
                    at(1, 12),
                    &[("Tea", i as i32, 100)],
                )
            })
            .collect();
        let metrics = build_dashboard_metrics(&orders, &[]);
        assert_eq!(metrics.highest_spending_tables.len(), 5);
        assert_eq!(metrics.highest_spending_tables[0].table_id, "t7");
        assert!(metrics.best_waiter_response_tables.is_empty());
    }

    #[test]
    fn test_summaries() {
        let (orders, calls) = fixture();
        let summary = summarize_orders(&orders, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(summary.todays_sales_cents, 1550);
        // orders 2 and 5 are on table 1
        assert_eq!(summary.active_orders, 2);
        assert_eq!(summary.active_tables, 1);
        assert_eq!(summarize_calls(&calls).pending_calls, 1);
    }

    #[test]
    fn test_response_minutes_requires_completion() {
        let pending = call(1, "1", at(1, 12), None);
        assert_eq!(response_minutes(&pending), None);
        let done = call(2, "1", at(1, 12), Some(11));
        assert_eq!(response_minutes(&done), Some(11));
    }
}
