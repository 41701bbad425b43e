use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::core::{money, AppError, Result};
use crate::modules::notifications::NotificationDispatcher;
use crate::modules::packages::repositories::PackageRepository;
use crate::modules::pricing::models::{PaymentMethod, TripSelection, TripType};
use crate::modules::pricing::services::SplitEngine;
use crate::modules::reservations::models::{ActorRole, Reservation};
use crate::modules::reservations::repositories::ReservationRepository;

/// Payload for creating a reservation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationRequest {
    pub package_id: String,
    pub client_id: String,
    pub trip_type: TripType,
    pub payment_method: PaymentMethod,
}

/// Business logic around the reservation lifecycle.
///
/// Every method is load → transition on the model → persist → notify. The
/// transition rules themselves live on [`Reservation`]; this layer wires the
/// collaborators and never retries a failed write.
pub struct ReservationService {
    reservations: Arc<dyn ReservationRepository>,
    packages: Arc<dyn PackageRepository>,
    engine: SplitEngine,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        packages: Arc<dyn PackageRepository>,
        engine: SplitEngine,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            reservations,
            packages,
            engine,
            dispatcher,
        }
    }

    /// Create a reservation, snapshotting the money split at this moment.
    /// Later package edits never reprice the booking.
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<Reservation> {
        let package = self
            .packages
            .find_by_id(&request.package_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Package {}", request.package_id)))?;

        let selection = TripSelection::new(request.trip_type, request.payment_method);
        let split = self.engine.compute_split(&package, &selection)?;

        let reservation =
            Reservation::new(request.package_id, request.client_id, selection, split)?;
        self.reservations.create(&reservation).await?;

        info!(
            reservation_id = %reservation.id.as_deref().unwrap_or("-"),
            package_id = %reservation.package_id,
            trip_type = %reservation.trip_type,
            "reservation created"
        );

        self.notify("reservation_created", &reservation).await;
        Ok(reservation)
    }

    pub async fn get_reservation(&self, id: &str) -> Result<Reservation> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {}", id)))
    }

    pub async fn list_for_driver(
        &self,
        driver_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>> {
        self.reservations
            .list_by_driver(driver_id, limit, offset)
            .await
    }

    pub async fn list_for_client(
        &self,
        client_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>> {
        self.reservations
            .list_by_client(client_id, limit, offset)
            .await
    }

    pub async fn list_awaiting_approval(&self, limit: i64, offset: i64) -> Result<Vec<Reservation>> {
        self.reservations.list_awaiting_approval(limit, offset).await
    }

    /// Owner assigns a driver
    pub async fn assign_driver(&self, id: &str, driver_id: &str) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        reservation.assign_driver(ActorRole::Owner, driver_id)?;
        self.reservations.update(&reservation).await?;

        self.notify("reservation_delegated", &reservation).await;
        Ok(reservation)
    }

    /// Driver confirms the trip. The caller identifies the driver; confirming
    /// someone else's trip is refused.
    pub async fn confirm(&self, id: &str, driver_id: &str) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        self.check_driver(&reservation, driver_id)?;
        reservation.confirm(ActorRole::Driver)?;
        self.reservations.update(&reservation).await?;

        self.notify("reservation_confirmed", &reservation).await;
        Ok(reservation)
    }

    /// Driver marks the trip done
    pub async fn complete(&self, id: &str, driver_id: &str) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        self.check_driver(&reservation, driver_id)?;
        reservation.complete(ActorRole::Driver)?;
        self.reservations.update(&reservation).await?;

        self.notify("reservation_completed", &reservation).await;
        Ok(reservation)
    }

    /// Owner approves a completed trip, releasing the payout
    pub async fn approve(&self, id: &str) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        reservation.approve(ActorRole::Owner)?;
        self.reservations.update(&reservation).await?;

        self.notify("reservation_approved", &reservation).await;
        Ok(reservation)
    }

    /// Owner sends a completed trip back to the driver
    pub async fn reject(&self, id: &str, reason: &str) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        reservation.reject(ActorRole::Owner, reason)?;
        self.reservations.update(&reservation).await?;

        self.notify("reservation_rejected", &reservation).await;
        Ok(reservation)
    }

    /// Any party cancels a not-yet-completed trip
    pub async fn cancel(&self, id: &str, actor: ActorRole, reason: &str) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        reservation.cancel(actor, reason)?;
        self.reservations.update(&reservation).await?;

        self.notify("reservation_cancelled", &reservation).await;
        Ok(reservation)
    }

    /// Record paid-deposit evidence reported by the payment provider. The
    /// amount is logged for the operator but does not gate the evidence;
    /// paid-or-not is all this layer consumes.
    pub async fn record_deposit_payment(
        &self,
        id: &str,
        provider_reference: &str,
        amount_paid: Decimal,
    ) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;

        let expected = reservation.split.deposit_with_method_discount;
        if amount_paid + money::one_cent() < expected {
            warn!(
                reservation_id = %id,
                amount_paid = %amount_paid,
                expected = %expected,
                "deposit paid below the quoted amount"
            );
        }

        reservation.record_deposit_payment(provider_reference);
        self.reservations.update(&reservation).await?;

        info!(
            reservation_id = %id,
            provider_reference = %provider_reference,
            "deposit payment recorded"
        );

        self.notify("deposit_received", &reservation).await;
        Ok(reservation)
    }

    fn check_driver(&self, reservation: &Reservation, driver_id: &str) -> Result<()> {
        match reservation.driver_id.as_deref() {
            Some(assigned) if assigned == driver_id => Ok(()),
            Some(_) => Err(AppError::forbidden(
                "Another driver is assigned to this reservation",
            )),
            None => Err(AppError::missing_driver(
                "Reservation has no assigned driver",
            )),
        }
    }

    /// Notification failures never abort a transition; the state change is
    /// already durable. They are logged and left to the delivery side.
    async fn notify(&self, template_key: &str, reservation: &Reservation) {
        let vars = reservation.template_vars();
        if let Err(e) = self.dispatcher.dispatch(template_key, &vars).await {
            warn!(
                template = template_key,
                reservation_id = %reservation.id.as_deref().unwrap_or("-"),
                error = %e,
                "notification dispatch failed"
            );
        }
    }
}
