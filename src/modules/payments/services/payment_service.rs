use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::reservations::services::ReservationService;

use super::provider::{ChargeRequest, ChargeResponse, ChargeStatus, PaymentProvider};

/// Glue between reservations and the payment provider: opens deposit charges
/// and feeds webhook evidence back into the lifecycle.
pub struct PaymentService {
    provider: Arc<dyn PaymentProvider>,
    reservations: Arc<ReservationService>,
}

impl PaymentService {
    pub fn new(provider: Arc<dyn PaymentProvider>, reservations: Arc<ReservationService>) -> Self {
        Self {
            provider,
            reservations,
        }
    }

    /// Open a charge for the reservation's discounted deposit
    pub async fn create_deposit_charge(
        &self,
        reservation_id: &str,
        payer_name: Option<String>,
        payer_email: Option<String>,
    ) -> Result<ChargeResponse> {
        let reservation = self.reservations.get_reservation(reservation_id).await?;

        if reservation.is_terminal() {
            return Err(AppError::validation(
                "Reservation is closed; no deposit is due",
            ));
        }

        if reservation.deposit_paid_at.is_some() {
            return Err(AppError::validation("Deposit is already paid"));
        }

        let request = ChargeRequest {
            reservation_id: reservation_id.to_string(),
            amount: reservation.split.deposit_with_method_discount,
            description: format!("Sinal da reserva {}", reservation_id),
            method: reservation.payment_method,
            payer_email,
            payer_name,
        };

        let response = self.provider.create_charge(request).await?;

        info!(
            reservation_id = %reservation_id,
            provider = %self.provider.name(),
            provider_reference = %response.provider_reference,
            "deposit charge created"
        );

        Ok(response)
    }

    /// Verify and apply a provider webhook. Only a paid event touches the
    /// reservation; everything else is logged and dropped.
    pub async fn handle_webhook(&self, signature: &str, payload: &str) -> Result<()> {
        self.provider.verify_webhook(signature, payload)?;
        let event = self.provider.parse_webhook(payload)?;

        match event.status {
            ChargeStatus::Paid => {
                self.reservations
                    .record_deposit_payment(
                        &event.reservation_id,
                        &event.provider_reference,
                        event.amount_paid,
                    )
                    .await?;
            }
            status => {
                info!(
                    provider = %self.provider.name(),
                    reservation_id = %event.reservation_id,
                    status = ?status,
                    "ignoring non-paid payment event"
                );
            }
        }

        Ok(())
    }
}
