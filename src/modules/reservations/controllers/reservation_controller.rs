use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::reservations::models::ActorRole;
use crate::modules::reservations::services::{CreateReservationRequest, ReservationService};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub driver_id: Option<String>,
    pub client_id: Option<String>,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DriverActionRequest {
    pub driver_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub actor: ActorRole,
    pub reason: String,
}

/// Create a reservation (client booking flow)
/// POST /reservations
pub async fn create_reservation(
    service: web::Data<Arc<ReservationService>>,
    request: web::Json<CreateReservationRequest>,
) -> Result<HttpResponse, AppError> {
    let reservation = service.create_reservation(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(reservation))
}

/// Get reservation by ID
/// GET /reservations/{id}
pub async fn get_reservation(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let reservation = service.get_reservation(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reservation))
}

/// List reservations for a driver or a client
/// GET /reservations?driver_id=… | ?client_id=…
pub async fn list_reservations(
    service: web::Data<Arc<ReservationService>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let reservations = match (&query.driver_id, &query.client_id) {
        (Some(driver_id), _) => {
            service
                .list_for_driver(driver_id, query.limit, query.offset)
                .await?
        }
        (None, Some(client_id)) => {
            service
                .list_for_client(client_id, query.limit, query.offset)
                .await?
        }
        (None, None) => {
            return Err(AppError::validation(
                "Provide driver_id or client_id to list reservations",
            ))
        }
    };

    Ok(HttpResponse::Ok().json(reservations))
}

/// List completed trips waiting for the owner's reconciliation
/// GET /reservations/awaiting-approval
pub async fn list_awaiting_approval(
    service: web::Data<Arc<ReservationService>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let reservations = service
        .list_awaiting_approval(query.limit, query.offset)
        .await?;
    Ok(HttpResponse::Ok().json(reservations))
}

/// Owner assigns a driver
/// POST /reservations/{id}/assign-driver
pub async fn assign_driver(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<String>,
    request: web::Json<AssignDriverRequest>,
) -> Result<HttpResponse, AppError> {
    let reservation = service
        .assign_driver(&path.into_inner(), &request.driver_id)
        .await?;
    Ok(HttpResponse::Ok().json(reservation))
}

/// Driver confirms the trip
/// POST /reservations/{id}/confirm
pub async fn confirm(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<String>,
    request: web::Json<DriverActionRequest>,
) -> Result<HttpResponse, AppError> {
    let reservation = service.confirm(&path.into_inner(), &request.driver_id).await?;
    Ok(HttpResponse::Ok().json(reservation))
}

/// Driver marks the trip done
/// POST /reservations/{id}/complete
pub async fn complete(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<String>,
    request: web::Json<DriverActionRequest>,
) -> Result<HttpResponse, AppError> {
    let reservation = service
        .complete(&path.into_inner(), &request.driver_id)
        .await?;
    Ok(HttpResponse::Ok().json(reservation))
}

/// Owner approves the completed trip
/// POST /reservations/{id}/approve
pub async fn approve(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let reservation = service.approve(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reservation))
}

/// Owner rejects the completed trip back to the driver
/// POST /reservations/{id}/reject
pub async fn reject(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<String>,
    request: web::Json<RejectRequest>,
) -> Result<HttpResponse, AppError> {
    let reservation = service.reject(&path.into_inner(), &request.reason).await?;
    Ok(HttpResponse::Ok().json(reservation))
}

/// Any party cancels a not-yet-completed trip
/// POST /reservations/{id}/cancel
pub async fn cancel(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<String>,
    request: web::Json<CancelRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let reservation = service
        .cancel(&path.into_inner(), request.actor, &request.reason)
        .await?;
    Ok(HttpResponse::Ok().json(reservation))
}

/// Configure reservation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reservations")
            .route("", web::post().to(create_reservation))
            .route("", web::get().to(list_reservations))
            .route("/awaiting-approval", web::get().to(list_awaiting_approval))
            .route("/{id}", web::get().to(get_reservation))
            .route("/{id}/assign-driver", web::post().to(assign_driver))
            .route("/{id}/confirm", web::post().to(confirm))
            .route("/{id}/complete", web::post().to(complete))
            .route("/{id}/approve", web::post().to(approve))
            .route("/{id}/reject", web::post().to(reject))
            .route("/{id}/cancel", web::post().to(cancel)),
    );
}
