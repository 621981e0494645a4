use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::WaiterCallService;

#[utoipa::path(
    get,
    path = "/admin/waiter-calls",
    tag = "waiter_call",
    params(
        ("status" = Option<String>, Query, description = "pending | completed")
    ),
    responses(
        (status = 200, description = "Waiter calls, newest first", body = [WaiterCallResponse])
    )
)]
pub async fn list_waiter_calls(
    waiter_call_service: web::Data<WaiterCallService>,
    query: web::Query<WaiterCallFilter>,
) -> Result<HttpResponse> {
    match waiter_call_service.list_calls(&query).await {
        Ok(calls) => Ok(HttpResponse::Ok().json(ApiResponse::success(calls))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/waiter-calls/{id}/status",
    tag = "waiter_call",
    params(("id" = i64, Path, description = "Waiter call id")),
    request_body = UpdateWaiterCallStatusRequest,
    responses(
        (status = 200, description = "Call updated", body = WaiterCallResponse),
        (status = 404, description = "No such call"),
        (status = 409, description = "Completed calls cannot be reopened")
    )
)]
pub async fn update_waiter_call_status(
    waiter_call_service: web::Data<WaiterCallService>,
    path: web::Path<i64>,
    request: web::Json<UpdateWaiterCallStatusRequest>,
) -> Result<HttpResponse> {
    match waiter_call_service
        .update_status(path.into_inner(), request.status)
        .await
    {
        Ok(call) => Ok(HttpResponse::Ok().json(ApiResponse::success(call))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn waiter_call_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/waiter-calls")
            .route("", web::get().to(list_waiter_calls))
            .route("/{id}/status", web::put().to(update_waiter_call_status)),
    );
}
