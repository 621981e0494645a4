use crate::entities::{OrderStatus, PaymentStatus, order_entity as orders, product_entity};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::ProductService;
use crate::services::change_feed::{ChangeFeed, ChangeKind, FeedTable};
use crate::utils::validate_table_id;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// Upper bound of a single line, matching the menu quantity selector
pub const MAX_LINE_QUANTITY: i32 = 99;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    product_service: ProductService,
    feed: ChangeFeed,
}

impl OrderService {
    pub fn new(
        pool: DatabaseConnection,
        product_service: ProductService,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            pool,
            product_service,
            feed,
        }
    }

    /// Places an order for a table.
    ///
    /// Names and prices are copied from the stored products, so the total is
    /// fixed at creation time and never recomputed.
    pub async fn create_order(
        &self,
        table_id: &str,
        request: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        let table_id = validate_table_id(table_id)?;
        let quantities = merge_quantities(&request.items)?;

        let ids: Vec<i64> = quantities.iter().map(|(id, _)| *id).collect();
        let products = self.product_service.find_available_by_ids(&ids).await?;
        let items = build_line_items(&quantities, &products)?;
        let total_cents = order_total_cents(&items);

        let now = Utc::now();
        let model = orders::ActiveModel {
            table_id: Set(table_id),
            status: Set(OrderStatus::Pending),
            payment_status: Set(PaymentStatus::Unpaid),
            total_cents: Set(total_cents),
            items: Set(serde_json::to_value(&items)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Order #{} placed for table {} ({} lines, {} cents)",
            model.id,
            model.table_id,
            items.len(),
            total_cents
        );
        self.feed
            .publish(FeedTable::Orders, ChangeKind::Insert, model.id);
        OrderResponse::try_from(model)
    }

    /// Newest first
    pub async fn list_orders(&self, filter: &OrderFilter) -> AppResult<Vec<OrderResponse>> {
        let mut query = orders::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(orders::Column::Status.eq(status));
        }
        if let Some(payment_status) = filter.payment_status {
            query = query.filter(orders::Column::PaymentStatus.eq(payment_status));
        }
        if let Some(table_id) = filter.table_id.as_deref() {
            let table_id = validate_table_id(table_id)?;
            query = query.filter(orders::Column::TableId.eq(table_id));
        }

        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(&self.pool)
            .await?;
        models.into_iter().map(OrderResponse::try_from).collect()
    }

    pub async fn get_order(&self, order_id: i64) -> AppResult<OrderResponse> {
        OrderResponse::try_from(self.find_model(order_id).await?)
    }

    pub async fn count_active_for_table(&self, table_id: &str) -> AppResult<u64> {
        let count = orders::Entity::find()
            .filter(orders::Column::TableId.eq(table_id))
            .filter(
                orders::Column::Status.is_in([OrderStatus::Pending, OrderStatus::Preparing]),
            )
            .count(&self.pool)
            .await?;
        Ok(count)
    }

    /// Explicit status change, checked against [`OrderStatus::allowed_transitions`].
    /// Setting the current status again is a no-op.
    pub async fn update_status(
        &self,
        order_id: i64,
        target: OrderStatus,
    ) -> AppResult<OrderResponse> {
        let model = self.find_model(order_id).await?;
        if model.status == target {
            return OrderResponse::try_from(model);
        }
        if !model.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition(format!(
                "Order {order_id} cannot move from {} to {target}",
                model.status
            )));
        }
        self.write_status(model, target).await
    }

    /// Dashboard toggle, see [`OrderStatus::next_in_cycle`].
    pub async fn advance_status(&self, order_id: i64) -> AppResult<OrderResponse> {
        let model = self.find_model(order_id).await?;
        let target = model.status.next_in_cycle();
        self.write_status(model, target).await
    }

    /// Payment status is a manual label; any value may be set.
    pub async fn update_payment_status(
        &self,
        order_id: i64,
        target: PaymentStatus,
    ) -> AppResult<OrderResponse> {
        let model = self.find_model(order_id).await?;
        if model.payment_status == target {
            return OrderResponse::try_from(model);
        }
        self.write_payment_status(model, target).await
    }

    pub async fn advance_payment_status(&self, order_id: i64) -> AppResult<OrderResponse> {
        let model = self.find_model(order_id).await?;
        let target = model.payment_status.next_in_cycle();
        self.write_payment_status(model, target).await
    }

    async fn find_model(&self, order_id: i64) -> AppResult<orders::Model> {
        orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found")))
    }

    async fn write_status(
        &self,
        model: orders::Model,
        target: OrderStatus,
    ) -> AppResult<OrderResponse> {
        let previous = model.status;
        let mut active = model.into_active_model();
        active.status = Set(target);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.pool).await?;

        log::info!("Order #{} status {previous} -> {target}", updated.id);
        self.feed
            .publish(FeedTable::Orders, ChangeKind::Update, updated.id);
        OrderResponse::try_from(updated)
    }

    async fn write_payment_status(
        &self,
        model: orders::Model,
        target: PaymentStatus,
    ) -> AppResult<OrderResponse> {
        let previous = model.payment_status;
        let mut active = model.into_active_model();
        active.payment_status = Set(target);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.pool).await?;

        log::info!("Order #{} payment {previous} -> {target}", updated.id);
        self.feed
            .publish(FeedTable::Orders, ChangeKind::Update, updated.id);
        OrderResponse::try_from(updated)
    }
}

/// Validates requested lines and merges repeated products, keeping first-seen order.
pub fn merge_quantities(items: &[CreateOrderItemRequest]) -> AppResult<Vec<(i64, i32)>> {
    if items.is_empty() {
        return Err(AppError::ValidationError(
            "No items selected, please select at least one item".to_string(),
        ));
    }

    let mut merged: Vec<(i64, i32)> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 || item.quantity > MAX_LINE_QUANTITY {
            return Err(AppError::ValidationError(format!(
                "Quantity for product {} must be between 1 and {MAX_LINE_QUANTITY}",
                item.product_id
            )));
        }
        match merged.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, quantity)) => *quantity += item.quantity,
            None => merged.push((item.product_id, item.quantity)),
        }
    }

    if let Some((id, _)) = merged.iter().find(|(_, q)| *q > MAX_LINE_QUANTITY) {
        return Err(AppError::ValidationError(format!(
            "Quantity for product {id} must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(merged)
}

pub fn build_line_items(
    quantities: &[(i64, i32)],
    products: &[product_entity::Model],
) -> AppResult<Vec<OrderItem>> {
    quantities
        .iter()
        .map(|(product_id, quantity)| {
            let product = products
                .iter()
                .find(|p| p.id == *product_id)
                .ok_or_else(|| {
                    AppError::ValidationError(format!("Product {product_id} is not available"))
                })?;
            Ok(OrderItem {
                product_id: product.id,
                name: product.name.clone(),
                quantity: *quantity,
                price_cents: product.price_cents,
            })
        })
        .collect()
}

pub fn order_total_cents(items: &[OrderItem]) -> i64 {
    items.iter().map(OrderItem::line_total_cents).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn line(product_id: i64, quantity: i32) -> CreateOrderItemRequest {
        CreateOrderItemRequest {
            product_id,
            quantity,
        }
    }

    async fn setup() -> (OrderService, ChangeFeed, Vec<ProductResponse>) {
        let pool = test_pool().await;
        let feed = ChangeFeed::new(16);
        let products = ProductService::new(pool.clone(), "Resto Chen");
        let menu = products.list_available(None).await.unwrap();
        (OrderService::new(pool, products, feed.clone()), feed, menu)
    }

    #[test]
    fn test_merge_quantities_combines_duplicates() {
        let merged = merge_quantities(&[line(2, 1), line(1, 3), line(2, 2)]).unwrap();
        assert_eq!(merged, vec![(2, 3), (1, 3)]);
    }

    #[test]
    fn test_merge_quantities_rejects_bad_input() {
        assert!(merge_quantities(&[]).is_err());
        assert!(merge_quantities(&[line(1, 0)]).is_err());
        assert!(merge_quantities(&[line(1, 100)]).is_err());
        assert!(merge_quantities(&[line(1, 60), line(1, 40)]).is_err());
    }

    #[test]
    fn test_order_total_is_sum_of_lines() {
        let items = vec![
            OrderItem {
                product_id: 1,
                name: "Dumplings".into(),
                quantity: 2,
                price_cents: 850,
            },
            OrderItem {
                product_id: 2,
                name: "Tea".into(),
                quantity: 3,
                price_cents: 350,
            },
        ];
        assert_eq!(order_total_cents(&items), 2 * 850 + 3 * 350);
        assert_eq!(order_total_cents(&[]), 0);
    }

    #[actix_web::test]
    async fn test_create_order_prices_from_menu() {
        let (service, feed, menu) = setup().await;
        let mut rx = feed.subscribe();
        let (a, b) = (&menu[0], &menu[1]);

        let order = service
            .create_order(
                "4",
                CreateOrderRequest {
                    items: vec![line(a.id, 2), line(b.id, 1)],
                },
            )
            .await
            .unwrap();

        assert_eq!(order.table_id, "4");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name, a.name);
        assert_eq!(order.total_cents, a.price_cents * 2 + b.price_cents);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(
            order.available_actions,
            vec![OrderStatus::Preparing, OrderStatus::Cancelled]
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, FeedTable::Orders);
        assert_eq!(event.kind, ChangeKind::Insert);
        assert_eq!(event.record_id, order.id);
    }

    #[actix_web::test]
    async fn test_create_order_rejects_unknown_product() {
        let (service, _feed, _menu) = setup().await;
        let err = service
            .create_order(
                "4",
                CreateOrderRequest {
                    items: vec![line(999_999, 1)],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(service.list_orders(&OrderFilter::default()).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_table_filter_is_normalized() {
        let (service, _feed, menu) = setup().await;
        service
            .create_order(
                "4",
                CreateOrderRequest {
                    items: vec![line(menu[0].id, 1)],
                },
            )
            .await
            .unwrap();

        let filter = OrderFilter {
            table_id: Some(" 4 ".to_string()),
            ..Default::default()
        };
        assert_eq!(service.list_orders(&filter).await.unwrap().len(), 1);

        let bad = OrderFilter {
            table_id: Some("4; drop".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.list_orders(&bad).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_status_transitions() {
        let (service, _feed, menu) = setup().await;
        let order = service
            .create_order(
                "1",
                CreateOrderRequest {
                    items: vec![line(menu[0].id, 1)],
                },
            )
            .await
            .unwrap();

        let err = service
            .update_status(order.id, OrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let preparing = service
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .unwrap();
        assert_eq!(preparing.status, OrderStatus::Preparing);
        assert!(preparing.updated_at >= order.updated_at);

        let same = service
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .unwrap();
        assert_eq!(same.updated_at, preparing.updated_at);

        let done = service
            .update_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert!(done.available_actions.is_empty());

        // dashboard toggle reopens it
        let reopened = service.advance_status(order.id).await.unwrap();
        assert_eq!(reopened.status, OrderStatus::Pending);

        assert!(matches!(
            service.update_status(424242, OrderStatus::Preparing).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_payment_status_and_filters() {
        let (service, _feed, menu) = setup().await;
        let first = service
            .create_order(
                "2",
                CreateOrderRequest {
                    items: vec![line(menu[0].id, 1)],
                },
            )
            .await
            .unwrap();
        let second = service
            .create_order(
                "3",
                CreateOrderRequest {
                    items: vec![line(menu[1].id, 2)],
                },
            )
            .await
            .unwrap();

        let paid = service.advance_payment_status(first.id).await.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        let refunded = service.advance_payment_status(first.id).await.unwrap();
        assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
        let paid_again = service
            .update_payment_status(first.id, PaymentStatus::Paid)
            .await
            .unwrap();
        assert_eq!(paid_again.payment_status, PaymentStatus::Paid);

        let all = service.list_orders(&OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id, "newest first");

        let only_paid = service
            .list_orders(&OrderFilter {
                payment_status: Some(PaymentStatus::Paid),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(only_paid.len(), 1);
        assert_eq!(only_paid[0].id, first.id);

        let table_three = service
            .list_orders(&OrderFilter {
                table_id: Some("3".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(table_three.len(), 1);
        assert_eq!(service.count_active_for_table("3").await.unwrap(), 1);
        assert_eq!(service.count_active_for_table("9").await.unwrap(), 0);
    }
}
