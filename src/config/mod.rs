use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub pricing: PricingConfig,
    pub mercadopago: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Knobs for the pricing/split engine
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Deposit percentage applied when a package carries no fixed amounts
    /// and no explicit percentage
    pub default_deposit_percentage: Decimal,
    /// Tolerance before a deposit-exceeds-total or sum-mismatch warning fires
    pub split_epsilon: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub access_token: String,
    pub webhook_secret: String,
    pub base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            pricing: PricingConfig {
                default_deposit_percentage: env::var("DEFAULT_DEPOSIT_PERCENTAGE")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid DEFAULT_DEPOSIT_PERCENTAGE".to_string())
                    })?,
                split_epsilon: env::var("SPLIT_EPSILON")
                    .unwrap_or_else(|_| "0.01".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid SPLIT_EPSILON".to_string()))?,
            },
            mercadopago: ProviderConfig {
                access_token: env::var("MERCADOPAGO_ACCESS_TOKEN").map_err(|_| {
                    AppError::Configuration("MERCADOPAGO_ACCESS_TOKEN not set".to_string())
                })?,
                webhook_secret: env::var("MERCADOPAGO_WEBHOOK_SECRET").map_err(|_| {
                    AppError::Configuration("MERCADOPAGO_WEBHOOK_SECRET not set".to_string())
                })?,
                base_url: env::var("MERCADOPAGO_BASE_URL")
                    .unwrap_or_else(|_| "https://api.mercadopago.com".to_string()),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pricing.default_deposit_percentage <= Decimal::ZERO
            || self.pricing.default_deposit_percentage > Decimal::from(100)
        {
            return Err(AppError::Configuration(
                "Deposit percentage must be between 0 and 100".to_string(),
            ));
        }

        if self.pricing.split_epsilon < Decimal::ZERO {
            return Err(AppError::Configuration(
                "Split epsilon cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}
