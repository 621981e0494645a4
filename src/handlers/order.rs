use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::OrderService;

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "order",
    params(
        ("status" = Option<String>, Query, description = "Order status filter"),
        ("payment_status" = Option<String>, Query, description = "unpaid | paid | refunded"),
        ("table_id" = Option<String>, Query, description = "Only orders from this table")
    ),
    responses(
        (status = 200, description = "Orders, newest first", body = [OrderResponse])
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    query: web::Query<OrderFilter>,
) -> Result<HttpResponse> {
    match order_service.list_orders(&query).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(ApiResponse::success(orders))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/orders/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order details", body = OrderResponse),
        (status = 404, description = "No such order")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match order_service.get_order(path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 404, description = "No such order"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_status(path.into_inner(), request.status)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/orders/{id}/status/advance",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Next status in the dashboard cycle", body = OrderResponse),
        (status = 404, description = "No such order")
    )
)]
pub async fn advance_order_status(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match order_service.advance_status(path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/orders/{id}/payment-status",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status updated", body = OrderResponse),
        (status = 404, description = "No such order")
    )
)]
pub async fn update_payment_status(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
    request: web::Json<UpdatePaymentStatusRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_payment_status(path.into_inner(), request.payment_status)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/orders/{id}/payment-status/advance",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Next payment status in the cycle", body = OrderResponse),
        (status = 404, description = "No such order")
    )
)]
pub async fn advance_payment_status(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match order_service.advance_payment_status(path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/orders")
            .route("", web::get().to(list_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/status", web::put().to(update_order_status))
            .route("/{id}/status/advance", web::post().to(advance_order_status))
            .route("/{id}/payment-status", web::put().to(update_payment_status))
            .route(
                "/{id}/payment-status/advance",
                web::post().to(advance_payment_status),
            ),
    );
}
