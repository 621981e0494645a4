pub mod admin;
pub mod live;
pub mod order;
pub mod product;
pub mod qr;
pub mod table;
pub mod waiter_call;

pub use admin::admin_config;
pub use live::live_config;
pub use order::order_config;
pub use product::product_config;
pub use qr::qr_config;
pub use table::table_config;
pub use waiter_call::waiter_call_config;

use actix_web::web;

use crate::services::AppServices;

/// Shares each service with the handlers as `web::Data`.
pub fn register_services(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.app_data(web::Data::new(services.products.clone()))
        .app_data(web::Data::new(services.orders.clone()))
        .app_data(web::Data::new(services.waiter_calls.clone()))
        .app_data(web::Data::new(services.analytics.clone()))
        .app_data(web::Data::new(services.qr.clone()))
        .app_data(web::Data::new(services.tables.clone()))
        .app_data(web::Data::new(services.live.clone()));
}

/// Routes mounted under `/api/v1`.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(table_config)
        .configure(product_config)
        .configure(order_config)
        .configure(waiter_call_config)
        .configure(qr_config)
        .configure(live_config)
        .configure(admin_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::test_pool;
    use actix_web::body::MessageBody;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::pin::Pin;

    async fn services() -> AppServices {
        let config = Config::with_database_url("sqlite::memory:");
        AppServices::new(test_pool().await, &config)
    }

    macro_rules! test_app {
        ($services:expr) => {
            test::init_service(
                App::new().configure(|cfg| register_services(cfg, &$services)).service(
                    web::scope("/api/v1").configure(api_config),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_tables_listing() {
        let services = services().await;
        let app = test_app!(services);

        let req = test::TestRequest::get().uri("/api/v1/tables").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 8);
        assert_eq!(body["data"][0]["url"], "http://localhost:3000/table/1");

        let req = test::TestRequest::get().uri("/api/v1/tables/bad%20id").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_order_lifecycle() {
        let services = services().await;
        let app = test_app!(services);

        let req = test::TestRequest::get()
            .uri("/api/v1/products?category=Drinks")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let product = &body["data"][0];
        let product_id = product["id"].as_i64().unwrap();
        let price = product["price_cents"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/v1/tables/4/orders")
            .set_json(json!({
                "items": [
                    { "product_id": product_id, "quantity": 2 },
                    { "product_id": product_id, "quantity": 1 }
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let order_id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["total_cents"], price * 3);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["status"], "pending");

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/orders?table_id=4&status=pending")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/admin/orders/{order_id}/status"))
            .set_json(json!({ "status": "completed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/admin/orders/{order_id}/status/advance"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "preparing");

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/admin/orders/{order_id}/payment-status"))
            .set_json(json!({ "payment_status": "paid" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["payment_status"], "paid");

        let req = test::TestRequest::get().uri("/api/v1/admin/dashboard").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["todays_sales_cents"], price * 3);
        assert_eq!(body["data"]["active_orders"], 1);
        assert_eq!(body["data"]["active_tables"], 1);

        let req = test::TestRequest::get().uri("/api/v1/admin/orders/999999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_empty_cart_is_rejected() {
        let services = services().await;
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/v1/tables/2/orders")
            .set_json(json!({ "items": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_waiter_call_flow() {
        let services = services().await;
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/v1/tables/7/waiter-calls")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let call_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/admin/waiter-calls/{call_id}/status"))
            .set_json(json!({ "status": "completed" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "completed");
        assert!(body["data"]["completed_at"].is_string());

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/admin/waiter-calls/{call_id}/status"))
            .set_json(json!({ "status": "pending" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get().uri("/api/v1/admin/analytics").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["waiter_metrics"]["completed_calls"], 1);
    }

    #[actix_web::test]
    async fn test_qr_codes() {
        let services = services().await;
        let app = test_app!(services);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/qr-codes/5?size=lg")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        let svg = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&svg).contains("<svg"));

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/qr-codes?start=1&end=10")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 10);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/qr-codes?start=10&end=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_live_stream_starts_with_snapshot() {
        let services = services().await;
        let app = test_app!(services);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/live/waiter-calls")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );

        let mut body = resp.into_body();
        let chunk = std::future::poll_fn(|cx| Pin::new(&mut body).poll_next(cx))
            .await
            .expect("first frame")
            .expect("frame bytes");
        let frame = String::from_utf8_lossy(&chunk);
        assert!(frame.starts_with("event: snapshot\n"));
        assert!(frame.contains(r#""pending_calls":0"#));
    }
}
