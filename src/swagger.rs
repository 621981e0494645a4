use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{OrderStatus, PaymentStatus, WaiterCallStatus};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::table::list_tables,
        handlers::table::get_table,
        handlers::table::get_menu,
        handlers::table::place_order,
        handlers::table::call_waiter,
        handlers::product::list_products,
        handlers::order::list_orders,
        handlers::order::get_order,
        handlers::order::update_order_status,
        handlers::order::advance_order_status,
        handlers::order::update_payment_status,
        handlers::order::advance_payment_status,
        handlers::waiter_call::list_waiter_calls,
        handlers::waiter_call::update_waiter_call_status,
        handlers::admin::dashboard,
        handlers::admin::analytics,
        handlers::qr::bulk_qr_codes,
        handlers::qr::table_qr_code,
        handlers::live::live_orders,
        handlers::live::live_waiter_calls,
    ),
    components(
        schemas(
            OrderStatus,
            PaymentStatus,
            WaiterCallStatus,
            ProductResponse,
            MenuCategory,
            MenuResponse,
            OrderItem,
            CreateOrderItemRequest,
            CreateOrderRequest,
            OrderResponse,
            UpdateOrderStatusRequest,
            UpdatePaymentStatusRequest,
            WaiterCallResponse,
            UpdateWaiterCallStatusRequest,
            TableSummary,
            TableView,
            QrSize,
            TableQrCode,
            TableMetrics,
            WaiterMetrics,
            ProductCount,
            OrderMetrics,
            DailyRevenue,
            DashboardMetrics,
            OrderSummary,
            WaiterCallSummary,
            DashboardSummary,
            LiveNotification,
            ApiError,
        )
    ),
    tags(
        (name = "table", description = "Customer-facing table API"),
        (name = "product", description = "Menu API"),
        (name = "order", description = "Order management API"),
        (name = "waiter_call", description = "Waiter call API"),
        (name = "admin", description = "Dashboard and analytics API"),
        (name = "qr", description = "Table QR code API"),
        (name = "live", description = "Live order and waiter-call streams"),
    ),
    info(
        title = "Resto Backend API",
        version = "1.0.0",
        description = "Table ordering REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
