use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::ProviderConfig;
use crate::core::{AppError, Result};
use crate::modules::pricing::models::PaymentMethod;

use super::provider::{
    ChargeRequest, ChargeResponse, ChargeStatus, PaymentEvent, PaymentProvider,
};

type HmacSha256 = Hmac<Sha256>;

/// Mercado Pago adapter.
///
/// Creates checkout preferences for the deposit and validates webhook
/// signatures (HMAC-SHA256 over the raw payload with the shared webhook
/// secret). Transient HTTP failures are retried by the client middleware;
/// the domain above never retries.
pub struct MercadoPagoProvider {
    client: ClientWithMiddleware,
    access_token: String,
    webhook_secret: String,
    base_url: String,
}

impl MercadoPagoProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            client,
            access_token: config.access_token.clone(),
            webhook_secret: config.webhook_secret.clone(),
            base_url: config.base_url.clone(),
        }
    }

    fn map_status(status: &str) -> ChargeStatus {
        match status {
            "approved" | "accredited" => ChargeStatus::Paid,
            "rejected" | "cancelled" | "refunded" | "charged_back" => ChargeStatus::Failed,
            "expired" => ChargeStatus::Expired,
            _ => ChargeStatus::Pending,
        }
    }
}

#[derive(Serialize)]
struct PreferenceItem {
    title: String,
    quantity: u32,
    unit_price: Decimal,
    currency_id: &'static str,
}

#[derive(Serialize)]
struct PreferencePayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

#[derive(Serialize)]
struct PreferenceRequest {
    external_reference: String,
    items: Vec<PreferenceItem>,
    payer: PreferencePayer,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<&'static str>,
}

#[derive(Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: String,
}

#[derive(Deserialize)]
struct MercadoPagoWebhook {
    id: String,
    external_reference: String,
    status: String,
    transaction_amount: Decimal,
}

#[async_trait]
impl PaymentProvider for MercadoPagoProvider {
    async fn create_charge(&self, request: ChargeRequest) -> Result<ChargeResponse> {
        let url = format!("{}/checkout/preferences", self.base_url);

        let preference = PreferenceRequest {
            external_reference: request.reservation_id.clone(),
            items: vec![PreferenceItem {
                title: request.description,
                quantity: 1,
                unit_price: request.amount,
                currency_id: "BRL",
            }],
            payer: PreferencePayer {
                name: request.payer_name,
                email: request.payer_email,
            },
            // Pix deposits go through the wallet-less flow
            purpose: match request.method {
                PaymentMethod::Pix => Some("wallet_purchase"),
                PaymentMethod::Card => None,
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&preference)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Mercado Pago request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Mercado Pago error {}: {}",
                status, body
            )));
        }

        let preference: PreferenceResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Invalid Mercado Pago response: {}", e)))?;

        Ok(ChargeResponse {
            provider_reference: preference.id,
            checkout_url: preference.init_point,
            status: ChargeStatus::Pending,
        })
    }

    fn verify_webhook(&self, signature: &str, payload: &str) -> Result<()> {
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
            .map_err(|_| AppError::internal("Webhook secret is unusable"))?;
        mac.update(payload.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        if !expected.eq_ignore_ascii_case(signature.trim()) {
            return Err(AppError::validation("Invalid webhook signature"));
        }

        Ok(())
    }

    fn parse_webhook(&self, payload: &str) -> Result<PaymentEvent> {
        let webhook: MercadoPagoWebhook = serde_json::from_str(payload)
            .map_err(|e| AppError::validation(format!("Invalid webhook payload: {}", e)))?;

        let raw: serde_json::Value = serde_json::from_str(payload)?;

        Ok(PaymentEvent {
            provider_reference: webhook.id,
            reservation_id: webhook.external_reference,
            amount_paid: webhook.transaction_amount,
            status: Self::map_status(&webhook.status),
            raw,
        })
    }

    fn name(&self) -> &str {
        "mercadopago"
    }
}
