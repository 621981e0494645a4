use actix_web::{HttpResponse, ResponseError, Result, http::header, web};

use crate::models::*;
use crate::services::QrService;

#[utoipa::path(
    get,
    path = "/admin/qr-codes",
    tag = "qr",
    params(
        ("start" = u32, Query, description = "First table number, at least 1"),
        ("end" = u32, Query, description = "Last table number, inclusive"),
        ("size" = Option<String>, Query, description = "sm | md | lg")
    ),
    responses(
        (status = 200, description = "One SVG per table in the range", body = [TableQrCode]),
        (status = 400, description = "Invalid or oversized range")
    )
)]
pub async fn bulk_qr_codes(
    qr_service: web::Data<QrService>,
    query: web::Query<BulkQrCodeQuery>,
) -> Result<HttpResponse> {
    let size = query.size.unwrap_or_default();
    match qr_service.bulk(query.start, query.end, size) {
        Ok(codes) => Ok(HttpResponse::Ok().json(ApiResponse::success(codes))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/qr-codes/{table_id}",
    tag = "qr",
    params(
        ("table_id" = String, Path, description = "Table identifier"),
        ("size" = Option<String>, Query, description = "sm | md | lg")
    ),
    responses(
        (status = 200, description = "SVG image", content_type = "image/svg+xml"),
        (status = 400, description = "Malformed table id")
    )
)]
pub async fn table_qr_code(
    qr_service: web::Data<QrService>,
    path: web::Path<String>,
    query: web::Query<QrCodeQuery>,
) -> Result<HttpResponse> {
    let size = query.size.unwrap_or_default();
    match qr_service.render_svg(&path.into_inner(), size) {
        Ok(code) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "image/svg+xml"))
            .body(code.svg)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn qr_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/qr-codes")
            .route("", web::get().to(bulk_qr_codes))
            .route("/{table_id}", web::get().to(table_qr_code)),
    );
}
