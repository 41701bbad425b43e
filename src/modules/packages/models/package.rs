use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{money, AppError, Result};
use crate::modules::pricing::models::TripType;

/// A sellable itinerary template.
///
/// This is the one canonical schema for package pricing. Historical data
/// spread these amounts over a dozen loosely-named fields; everything is
/// normalized into this shape at the store boundary and validated once,
/// so the pricing engine never has to chase fallback chains.
///
/// Pricing works in one of two modes:
/// - fixed-split: `deposit_amount` (and the payout fields) are authored as
///   absolute amounts and used verbatim;
/// - legacy percentage: `deposit_percentage` (default 30) of the total is the
///   deposit, the remainder goes to the driver(s).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPackage {
    /// Unique package ID (UUID)
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    pub title: String,
    pub origin: String,
    pub destination: String,

    /// Price for a single outbound leg
    pub price_one_way: Option<Decimal>,

    /// Price for a single return leg
    pub price_return_only: Option<Decimal>,

    /// Price for outbound plus return
    pub price_round_trip: Option<Decimal>,

    pub supports_round_trip: bool,

    /// Fixed deposit amount; presence of this field selects fixed-split mode
    pub deposit_amount: Option<Decimal>,

    /// Fixed first-leg driver payout
    pub first_leg_payout: Option<Decimal>,

    /// Fixed second-leg driver payout; round trips mirror the first leg
    /// when unset
    pub second_leg_payout: Option<Decimal>,

    /// Legacy deposit percentage, only consulted when no fixed amounts exist
    pub deposit_percentage: Option<Decimal>,

    /// Inactive packages are hidden from listings but keep their history
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Payload for creating or replacing a package
#[derive(Debug, Clone, Deserialize)]
pub struct PackagePayload {
    pub title: String,
    pub origin: String,
    pub destination: String,
    pub price_one_way: Option<Decimal>,
    pub price_return_only: Option<Decimal>,
    pub price_round_trip: Option<Decimal>,
    #[serde(default)]
    pub supports_round_trip: bool,
    pub deposit_amount: Option<Decimal>,
    pub first_leg_payout: Option<Decimal>,
    pub second_leg_payout: Option<Decimal>,
    pub deposit_percentage: Option<Decimal>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl TravelPackage {
    /// Create a new validated package from a payload
    pub fn from_payload(payload: PackagePayload) -> Result<Self> {
        let now = Utc::now();

        let package = Self {
            id: Some(Uuid::new_v4().to_string()),
            title: payload.title,
            origin: payload.origin,
            destination: payload.destination,
            price_one_way: payload.price_one_way,
            price_return_only: payload.price_return_only,
            price_round_trip: payload.price_round_trip,
            supports_round_trip: payload.supports_round_trip,
            deposit_amount: payload.deposit_amount,
            first_leg_payout: payload.first_leg_payout,
            second_leg_payout: payload.second_leg_payout,
            deposit_percentage: payload.deposit_percentage,
            active: payload.active,
            created_at: Some(now),
            updated_at: Some(now),
        };

        package.validate()?;
        Ok(package)
    }

    /// Replace the editable fields with a new payload, keeping identity and
    /// creation time
    pub fn apply_payload(&mut self, payload: PackagePayload) -> Result<()> {
        self.title = payload.title;
        self.origin = payload.origin;
        self.destination = payload.destination;
        self.price_one_way = payload.price_one_way;
        self.price_return_only = payload.price_return_only;
        self.price_round_trip = payload.price_round_trip;
        self.supports_round_trip = payload.supports_round_trip;
        self.deposit_amount = payload.deposit_amount;
        self.first_leg_payout = payload.first_leg_payout;
        self.second_leg_payout = payload.second_leg_payout;
        self.deposit_percentage = payload.deposit_percentage;
        self.active = payload.active;
        self.updated_at = Some(Utc::now());

        self.validate()
    }

    /// Validate the canonical schema. Called on every write and before every
    /// pricing computation.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Package title cannot be empty"));
        }

        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(AppError::validation(
                "Package origin and destination cannot be empty",
            ));
        }

        for (field, amount) in [
            ("price_one_way", self.price_one_way),
            ("price_return_only", self.price_return_only),
            ("price_round_trip", self.price_round_trip),
            ("deposit_amount", self.deposit_amount),
            ("first_leg_payout", self.first_leg_payout),
            ("second_leg_payout", self.second_leg_payout),
        ] {
            if let Some(amount) = amount {
                money::validate_amount(field, amount).map_err(AppError::InvalidConfig)?;
            }
        }

        if let Some(percentage) = self.deposit_percentage {
            if percentage < Decimal::ZERO {
                return Err(AppError::invalid_config(
                    "deposit_percentage cannot be negative",
                ));
            }
        }

        Ok(())
    }

    /// Whether fixed-split mode applies. Keyed on the deposit amount alone;
    /// partially authored payout fields stay in fixed mode and surface
    /// through the engine's reconciliation warning instead.
    pub fn has_fixed_split(&self) -> bool {
        self.deposit_amount.is_some()
    }

    /// Price for the requested trip type
    pub fn price_for(&self, trip_type: TripType) -> Result<Decimal> {
        if trip_type == TripType::RoundTrip && !self.supports_round_trip {
            return Err(AppError::invalid_selection(format!(
                "Package '{}' does not offer round trips",
                self.title
            )));
        }

        let price = match trip_type {
            TripType::OneWay => self.price_one_way,
            TripType::ReturnOnly => self.price_return_only,
            TripType::RoundTrip => self.price_round_trip,
        };

        price.ok_or_else(|| {
            AppError::invalid_selection(format!(
                "Package '{}' has no price for {}",
                self.title, trip_type
            ))
        })
    }
}
