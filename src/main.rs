use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rotatur::config::Config;
use rotatur::middleware::RequestId;
use rotatur::modules::notifications::TracingDispatcher;
use rotatur::modules::packages::{self, MySqlPackageRepository, PackageRepository, PackageService};
use rotatur::modules::payments::{self, MercadoPagoProvider, PaymentProvider, PaymentService};
use rotatur::modules::pricing::SplitEngine;
use rotatur::modules::reservations::{
    self, MySqlReservationRepository, ReservationRepository, ReservationService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rotatur=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Rotatur booking backend");
    tracing::info!("Environment: {}", config.app.env);

    // Create database connection pool and apply migrations
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(
        "Database pool initialized (up to {} connections)",
        config.database.max_connections
    );

    // Wire repositories, engine, and services
    let package_repo: Arc<dyn PackageRepository> =
        Arc::new(MySqlPackageRepository::new(db_pool.clone()));
    let reservation_repo: Arc<dyn ReservationRepository> =
        Arc::new(MySqlReservationRepository::new(db_pool.clone()));
    let engine = SplitEngine::new(&config.pricing);
    let dispatcher = Arc::new(TracingDispatcher);
    let provider: Arc<dyn PaymentProvider> =
        Arc::new(MercadoPagoProvider::new(&config.mercadopago));

    let package_service = Arc::new(PackageService::new(package_repo.clone(), engine.clone()));
    let reservation_service = Arc::new(ReservationService::new(
        reservation_repo,
        package_repo,
        engine,
        dispatcher,
    ));
    let payment_service = Arc::new(PaymentService::new(provider, reservation_service.clone()));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .app_data(web::Data::new(package_service.clone()))
            .app_data(web::Data::new(reservation_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .configure(packages::controllers::configure)
            .configure(reservations::controllers::configure)
            .configure(payments::controllers::configure)
            .route("/health", web::get().to(health_check))
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "rotatur"
    }))
}
