use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::ProductService;

#[utoipa::path(
    get,
    path = "/products",
    tag = "product",
    params(
        ("category" = Option<String>, Query, description = "Only products in this category")
    ),
    responses(
        (status = 200, description = "Available products", body = [ProductResponse])
    )
)]
pub async fn list_products(
    product_service: web::Data<ProductService>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    match product_service
        .list_available(query.category.as_deref())
        .await
    {
        Ok(products) => Ok(HttpResponse::Ok().json(ApiResponse::success(products))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/products").route("", web::get().to(list_products)));
}
