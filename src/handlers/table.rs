use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::{OrderService, ProductService, TableService, WaiterCallService};

#[utoipa::path(
    get,
    path = "/tables",
    tag = "table",
    responses(
        (status = 200, description = "Tables with their public URLs", body = [TableSummary])
    )
)]
pub async fn list_tables(table_service: web::Data<TableService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(table_service.list_tables())))
}

#[utoipa::path(
    get,
    path = "/tables/{table_id}",
    tag = "table",
    params(
        ("table_id" = String, Path, description = "Table identifier from the QR code")
    ),
    responses(
        (status = 200, description = "Table landing view", body = TableView),
        (status = 400, description = "Malformed table id")
    )
)]
pub async fn get_table(
    table_service: web::Data<TableService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match table_service.table_view(&path.into_inner()).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/tables/{table_id}/menu",
    tag = "table",
    params(
        ("table_id" = String, Path, description = "Table identifier")
    ),
    responses(
        (status = 200, description = "Available products grouped by category", body = MenuResponse),
        (status = 400, description = "Malformed table id")
    )
)]
pub async fn get_menu(
    product_service: web::Data<ProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match product_service.menu_for_table(&path.into_inner()).await {
        Ok(menu) => Ok(HttpResponse::Ok().json(ApiResponse::success(menu))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/tables/{table_id}/orders",
    tag = "table",
    params(
        ("table_id" = String, Path, description = "Table placing the order")
    ),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Empty cart, bad quantity or unknown product")
    )
)]
pub async fn place_order(
    order_service: web::Data<OrderService>,
    path: web::Path<String>,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service
        .create_order(&path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
            order,
            "Order placed".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/tables/{table_id}/waiter-calls",
    tag = "table",
    params(
        ("table_id" = String, Path, description = "Table asking for a waiter")
    ),
    responses(
        (status = 201, description = "Waiter called", body = WaiterCallResponse),
        (status = 400, description = "Malformed table id")
    )
)]
pub async fn call_waiter(
    waiter_call_service: web::Data<WaiterCallService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match waiter_call_service.call_waiter(&path.into_inner()).await {
        Ok(call) => Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
            call,
            "A waiter is on the way".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn table_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tables")
            .route("", web::get().to(list_tables))
            .route("/{table_id}", web::get().to(get_table))
            .route("/{table_id}/menu", web::get().to(get_menu))
            .route("/{table_id}/orders", web::post().to(place_order))
            .route("/{table_id}/waiter-calls", web::post().to(call_waiter)),
    );
}
