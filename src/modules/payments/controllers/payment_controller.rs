use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::payments::services::PaymentService;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub payer_name: Option<String>,
    pub payer_email: Option<String>,
}

/// Open a deposit charge for a reservation
/// POST /payments/checkout/{reservation_id}
pub async fn checkout(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<String>,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let charge = service
        .create_deposit_charge(&path.into_inner(), request.payer_name, request.payer_email)
        .await?;
    Ok(HttpResponse::Created().json(charge))
}

/// Payment provider webhook. The raw body is needed for signature
/// verification, so this takes bytes rather than parsed JSON.
/// POST /payments/webhooks/mercadopago
pub async fn mercadopago_webhook(
    service: web::Data<Arc<PaymentService>>,
    http_request: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let signature = http_request
        .headers()
        .get("x-signature")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::validation("Missing x-signature header"))?;

    let payload = std::str::from_utf8(&body)
        .map_err(|_| AppError::validation("Webhook payload is not valid UTF-8"))?;

    service.handle_webhook(signature, payload).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "received": true })))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("/checkout/{reservation_id}", web::post().to(checkout))
            .route("/webhooks/mercadopago", web::post().to(mercadopago_webhook)),
    );
}
