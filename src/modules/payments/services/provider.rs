use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::modules::pricing::models::PaymentMethod;

/// Payment provider seam.
///
/// The domain only ever asks two things of a provider: open a charge for the
/// discounted deposit, and turn a webhook into paid-or-not evidence. Provider
/// protocol details stay behind this trait.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a deposit charge and return where to send the customer
    async fn create_charge(&self, request: ChargeRequest) -> Result<ChargeResponse>;

    /// Verify a webhook signature before trusting the payload
    fn verify_webhook(&self, signature: &str, payload: &str) -> Result<()>;

    /// Parse a verified webhook payload into a payment event
    fn parse_webhook(&self, payload: &str) -> Result<PaymentEvent>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Charge creation data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Reservation the deposit belongs to, echoed back by webhooks
    pub reservation_id: String,

    /// Amount to charge: the deposit after any method discount
    pub amount: Decimal,

    pub description: String,
    pub method: PaymentMethod,
    pub payer_email: Option<String>,
    pub payer_name: Option<String>,
}

/// Provider's answer to a charge creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeResponse {
    pub provider_reference: String,

    /// URL the customer completes the payment at
    pub checkout_url: String,

    pub status: ChargeStatus,
}

/// Charge status as this service understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Pending,
    Paid,
    Failed,
    Expired,
}

/// A webhook decoded into evidence the reservation lifecycle can consume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub provider_reference: String,

    /// Our reservation id, carried as the provider's external reference
    pub reservation_id: String,

    pub amount_paid: Decimal,
    pub status: ChargeStatus,

    /// Full provider payload, kept for the operator
    pub raw: serde_json::Value,
}
