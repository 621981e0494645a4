//! Server-Sent Event streams over live subscriptions.
//!
//! The subscription lives inside the response stream, so a client
//! disconnect drops it and stops its sync task.

use actix_web::{HttpResponse, Result, http::header, web};
use futures_util::stream;

use crate::models::*;
use crate::services::{
    LiveRecord, LiveSubscription, LiveSyncService, OrderService, OrderSnapshotSource,
    WaiterCallService, WaiterCallSnapshotSource,
};

fn sse_response<T: LiveRecord>(subscription: LiveSubscription<T>) -> HttpResponse {
    let events = stream::unfold(subscription, |mut subscription| async move {
        let update = subscription.recv().await?;
        match update.to_sse_frame() {
            Ok(frame) => Some((Ok::<_, actix_web::Error>(web::Bytes::from(frame)), subscription)),
            Err(e) => {
                log::error!("Dropping live subscription {}: {e}", subscription.id());
                None
            }
        }
    });

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events)
}

#[utoipa::path(
    get,
    path = "/admin/live/orders",
    tag = "live",
    params(
        ("status" = Option<String>, Query, description = "Order status filter"),
        ("payment_status" = Option<String>, Query, description = "unpaid | paid | refunded"),
        ("table_id" = Option<String>, Query, description = "Only orders from this table")
    ),
    responses(
        (
            status = 200,
            description = "Snapshot, notification and heartbeat events",
            content_type = "text/event-stream"
        )
    )
)]
pub async fn live_orders(
    live_sync: web::Data<LiveSyncService>,
    order_service: web::Data<OrderService>,
    query: web::Query<OrderFilter>,
) -> Result<HttpResponse> {
    let subscription = live_sync.subscribe(OrderSnapshotSource {
        service: order_service.get_ref().clone(),
        filter: query.into_inner(),
    });
    log::info!("Live order stream {} opened", subscription.id());
    Ok(sse_response(subscription))
}

#[utoipa::path(
    get,
    path = "/admin/live/waiter-calls",
    tag = "live",
    params(
        ("status" = Option<String>, Query, description = "pending | completed")
    ),
    responses(
        (
            status = 200,
            description = "Snapshot, notification and heartbeat events",
            content_type = "text/event-stream"
        )
    )
)]
pub async fn live_waiter_calls(
    live_sync: web::Data<LiveSyncService>,
    waiter_call_service: web::Data<WaiterCallService>,
    query: web::Query<WaiterCallFilter>,
) -> Result<HttpResponse> {
    let subscription = live_sync.subscribe(WaiterCallSnapshotSource {
        service: waiter_call_service.get_ref().clone(),
        filter: query.into_inner(),
    });
    log::info!("Live waiter-call stream {} opened", subscription.id());
    Ok(sse_response(subscription))
}

pub fn live_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/live")
            .route("/orders", web::get().to(live_orders))
            .route("/waiter-calls", web::get().to(live_waiter_calls)),
    );
}
