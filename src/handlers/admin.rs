use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::AnalyticsService;

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    responses(
        (status = 200, description = "Today's sales and open work", body = DashboardSummary)
    )
)]
pub async fn dashboard(analytics_service: web::Data<AnalyticsService>) -> Result<HttpResponse> {
    match analytics_service.dashboard_summary().await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/analytics",
    tag = "admin",
    responses(
        (status = 200, description = "Dashboard analytics", body = DashboardMetrics)
    )
)]
pub async fn analytics(analytics_service: web::Data<AnalyticsService>) -> Result<HttpResponse> {
    match analytics_service.dashboard_metrics().await {
        Ok(metrics) => Ok(HttpResponse::Ok().json(ApiResponse::success(metrics))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    // plain resources: a "/admin" scope here would shadow the other admin scopes
    cfg.route("/admin/dashboard", web::get().to(dashboard))
        .route("/admin/analytics", web::get().to(analytics));
}
