use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::packages::models::PackagePayload;
use crate::modules::packages::services::PackageService;
use crate::modules::pricing::models::{PaymentMethod, TripSelection, TripType};

/// Query parameters for listing packages
#[derive(Debug, Deserialize)]
pub struct ListPackagesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub trip_type: TripType,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Deserialize)]
pub struct AutoDivideRequest {
    pub trip_type: TripType,
}

/// Create a new package
/// POST /packages
pub async fn create_package(
    service: web::Data<Arc<PackageService>>,
    payload: web::Json<PackagePayload>,
) -> Result<HttpResponse, AppError> {
    let package = service.create_package(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(package))
}

/// Get package by ID
/// GET /packages/{id}
pub async fn get_package(
    service: web::Data<Arc<PackageService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let package = service.get_package(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(package))
}

/// List active packages
/// GET /packages
pub async fn list_packages(
    service: web::Data<Arc<PackageService>>,
    query: web::Query<ListPackagesQuery>,
) -> Result<HttpResponse, AppError> {
    let packages = service.list_packages(query.limit, query.offset).await?;
    Ok(HttpResponse::Ok().json(packages))
}

/// Replace a package
/// PUT /packages/{id}
pub async fn update_package(
    service: web::Data<Arc<PackageService>>,
    path: web::Path<String>,
    payload: web::Json<PackagePayload>,
) -> Result<HttpResponse, AppError> {
    let package = service
        .update_package(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(package))
}

/// Delete a package
/// DELETE /packages/{id}
pub async fn delete_package(
    service: web::Data<Arc<PackageService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_package(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Price a selection against a package
/// POST /packages/{id}/quote
pub async fn quote(
    service: web::Data<Arc<PackageService>>,
    path: web::Path<String>,
    request: web::Json<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let selection = TripSelection::new(request.trip_type, request.payment_method);
    let split = service.quote(&path.into_inner(), selection).await?;
    Ok(HttpResponse::Ok().json(split))
}

/// Split the full price into three equal parts (owner panel helper)
/// POST /packages/{id}/auto-divide
pub async fn auto_divide(
    service: web::Data<Arc<PackageService>>,
    path: web::Path<String>,
    request: web::Json<AutoDivideRequest>,
) -> Result<HttpResponse, AppError> {
    let shares = service
        .auto_divide(&path.into_inner(), request.trip_type)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "shares": shares })))
}

/// Configure package routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/packages")
            .route("", web::post().to(create_package))
            .route("", web::get().to(list_packages))
            .route("/{id}", web::get().to(get_package))
            .route("/{id}", web::put().to(update_package))
            .route("/{id}", web::delete().to(delete_package))
            .route("/{id}/quote", web::post().to(quote))
            .route("/{id}/auto-divide", web::post().to(auto_divide)),
    );
}
