// Reservation lifecycle driven over the HTTP surface with in-memory
// collaborators and a stub payment provider. Exercises routing, JSON
// shapes, the webhook path, and error status codes.

use std::sync::Arc;

use actix_web::{test, web, App};
use rust_decimal_macros::dec;
use serde_json::json;

use rotatur::modules::payments::services::PaymentService;
use rotatur::modules::pricing::services::SplitEngine;
use rotatur::modules::reservations::services::ReservationService;
use rotatur::modules::{payments, reservations};

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::fakes::{
    InMemoryPackageRepository, InMemoryReservationRepository, RecordingDispatcher,
    StubPaymentProvider,
};
use helpers::test_data::percentage_package;

macro_rules! init_app {
    () => {{
        let packages = Arc::new(InMemoryPackageRepository::with_packages(vec![
            percentage_package("pkg-300"),
        ]));
        let reservations_repo = Arc::new(InMemoryReservationRepository::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());

        let reservation_service = Arc::new(ReservationService::new(
            reservations_repo,
            packages,
            SplitEngine::default(),
            dispatcher,
        ));
        let payment_service = Arc::new(PaymentService::new(
            Arc::new(StubPaymentProvider),
            reservation_service.clone(),
        ));

        test::init_service(
            App::new()
                .app_data(web::Data::new(reservation_service.clone()))
                .app_data(web::Data::new(payment_service.clone()))
                .configure(reservations::controllers::configure)
                .configure(payments::controllers::configure),
        )
        .await
    }};
}

macro_rules! create_booking {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/reservations")
            .set_json(json!({
                "package_id": "pkg-300",
                "client_id": "client-1",
                "trip_type": "round_trip",
                "payment_method": "pix"
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&$app, req).await;
        body
    }};
}

fn decimal(value: &serde_json::Value) -> rust_decimal::Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[actix_web::test]
async fn test_create_reservation_returns_snapshot() {
    let app = init_app!();

    let body = create_booking!(app);

    assert_eq!(body["status"], "pending");
    assert_eq!(decimal(&body["split"]["total_price"]), dec!(300));
    assert_eq!(decimal(&body["split"]["deposit"]), dec!(90));
    assert_eq!(
        decimal(&body["split"]["deposit_with_method_discount"]),
        dec!(85.50)
    );
    assert!(body["id"].is_string());
}

#[actix_web::test]
async fn test_lifecycle_over_http() {
    let app = init_app!();

    let body = create_booking!(app);
    let id = body["id"].as_str().unwrap().to_string();

    // owner delegates
    let req = test::TestRequest::post()
        .uri(&format!("/reservations/{}/assign-driver", id))
        .set_json(json!({ "driver_id": "driver-1" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "delegated");

    // provider reports the deposit paid
    let req = test::TestRequest::post()
        .uri("/payments/webhooks/mercadopago")
        .insert_header(("x-signature", "test-signature"))
        .set_payload(
            json!({
                "reservation_id": id,
                "reference": "stub-1",
                "amount": "85.50",
                "paid": true
            })
            .to_string(),
        )
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // driver confirms and completes
    let req = test::TestRequest::post()
        .uri(&format!("/reservations/{}/confirm", id))
        .set_json(json!({ "driver_id": "driver-1" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "confirmed");

    let req = test::TestRequest::post()
        .uri(&format!("/reservations/{}/complete", id))
        .set_json(json!({ "driver_id": "driver-1" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["awaiting_approval"], json!(true));

    // owner panel sees it, approves it
    let req = test::TestRequest::get()
        .uri("/reservations/awaiting-approval")
        .to_request();
    let queue: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/reservations/{}/approve", id))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "approved");

    // driver listing still shows the trip
    let req = test::TestRequest::get()
        .uri("/reservations?driver_id=driver-1")
        .to_request();
    let list: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_out_of_order_approval_is_conflict() {
    let app = init_app!();

    let body = create_booking!(app);
    let id = body["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/reservations/{}/approve", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let message = body["error"]["message"].as_str().unwrap();
    // state names verbatim, so a stale panel can be diagnosed
    assert!(message.contains("pending"));
    assert!(message.contains("approved"));
}

#[actix_web::test]
async fn test_webhook_with_bad_signature_is_rejected() {
    let app = init_app!();

    let body = create_booking!(app);
    let id = body["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/payments/webhooks/mercadopago")
        .insert_header(("x-signature", "forged"))
        .set_payload(
            json!({ "reservation_id": id, "reference": "x", "amount": "85.50", "paid": true })
                .to_string(),
        )
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_checkout_charges_discounted_deposit() {
    let app = init_app!();

    let body = create_booking!(app);
    let id = body["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/payments/checkout/{}", id))
        .set_json(json!({ "payer_name": "Ana", "payer_email": "ana@example.com" }))
        .to_request();
    let charge: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(charge["status"], "pending");
    assert!(charge["checkout_url"].as_str().unwrap().starts_with("https://"));
}

#[actix_web::test]
async fn test_cancel_requires_reason() {
    let app = init_app!();

    let body = create_booking!(app);
    let id = body["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/reservations/{}/cancel", id))
        .set_json(json!({ "actor": "client", "reason": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri(&format!("/reservations/{}/cancel", id))
        .set_json(json!({ "actor": "client", "reason": "changed plans" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "cancelled");
}
