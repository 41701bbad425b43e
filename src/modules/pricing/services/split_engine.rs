use rust_decimal::Decimal;
use tracing::warn;

use crate::config::PricingConfig;
use crate::core::{money, AppError, Result};
use crate::modules::packages::models::TravelPackage;
use crate::modules::pricing::models::{MoneySplit, PaymentMethod, TripSelection, TripType};

/// Pure pricing/split engine.
///
/// Derives the deposit ("sinal") and per-leg driver payouts for a trip
/// selection against a package. No I/O, no clock, no mutation; the caller
/// decides when to recompute and when to keep a snapshot.
#[derive(Debug, Clone)]
pub struct SplitEngine {
    default_deposit_percentage: Decimal,
    epsilon: Decimal,
}

impl Default for SplitEngine {
    fn default() -> Self {
        Self {
            default_deposit_percentage: Decimal::from(30),
            epsilon: money::one_cent(),
        }
    }
}

impl SplitEngine {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            default_deposit_percentage: config.default_deposit_percentage,
            epsilon: config.split_epsilon,
        }
    }

    /// Compute the money split for a selection against a package.
    ///
    /// Packages authored with a fixed `deposit_amount` are in fixed-split
    /// mode: the authored amounts are used verbatim, never re-derived. All
    /// other packages fall back to the legacy percentage computation.
    pub fn compute_split(
        &self,
        package: &TravelPackage,
        selection: &TripSelection,
    ) -> Result<MoneySplit> {
        package.validate()?;

        let total_price = money::round(package.price_for(selection.trip_type)?);

        let (deposit, first_leg, second_leg) = if package.has_fixed_split() {
            Self::fixed_amounts(package, selection.trip_type)
        } else {
            let percentage = package
                .deposit_percentage
                .unwrap_or(self.default_deposit_percentage);
            self.split_legacy_percentage(total_price, percentage, selection.trip_type)
        };

        let deposit = money::round(deposit);
        let first_leg_payout = money::round(first_leg);
        let second_leg_payout = money::round(second_leg);
        let deposit_with_method_discount =
            Self::apply_method_discount(deposit, selection.payment_method);

        let mut split = MoneySplit {
            total_price,
            deposit,
            deposit_with_method_discount,
            first_leg_payout,
            second_leg_payout,
            warning: None,
        };

        self.reconcile(&mut split, package);

        Ok(split)
    }

    /// Legacy percentage mode: deposit is a percentage of the total, the
    /// remainder goes to the driver(s). Round trips split the remainder into
    /// two equal legs.
    ///
    /// This is NOT the same formula as [`Self::equal_thirds_auto_divide`];
    /// the two back different panel actions and are intentionally separate.
    pub fn split_legacy_percentage(
        &self,
        total_price: Decimal,
        percentage: Decimal,
        trip_type: TripType,
    ) -> (Decimal, Decimal, Decimal) {
        let deposit = money::round(total_price * percentage / Decimal::from(100));
        let remainder = total_price - deposit;

        match trip_type {
            TripType::RoundTrip => {
                let leg = money::round(remainder / Decimal::from(2));
                (deposit, leg, leg)
            }
            TripType::OneWay | TripType::ReturnOnly => (deposit, remainder, Decimal::ZERO),
        }
    }

    /// The owner panel's "auto divide" action: three equal parts of the full
    /// price, no separate deposit.
    pub fn equal_thirds_auto_divide(&self, total_price: Decimal) -> Result<[Decimal; 3]> {
        if total_price < Decimal::ZERO {
            return Err(AppError::invalid_config(
                "Cannot auto-divide a negative amount",
            ));
        }

        let share = money::round(total_price / Decimal::from(3));
        Ok([share, share, share])
    }

    /// Fixed-split mode amounts, used verbatim. A round trip with no second
    /// leg amount mirrors the first leg; legacy packages were authored that
    /// way and rebalancing them here would change long-standing payouts.
    fn fixed_amounts(package: &TravelPackage, trip_type: TripType) -> (Decimal, Decimal, Decimal) {
        let deposit = package.deposit_amount.unwrap_or(Decimal::ZERO);
        let first_leg = package.first_leg_payout.unwrap_or(Decimal::ZERO);

        let second_leg = match trip_type {
            TripType::RoundTrip => package.second_leg_payout.unwrap_or(first_leg),
            TripType::OneWay | TripType::ReturnOnly => Decimal::ZERO,
        };

        (deposit, first_leg, second_leg)
    }

    fn apply_method_discount(deposit: Decimal, method: PaymentMethod) -> Decimal {
        match method {
            // 5% off the deposit only
            PaymentMethod::Pix => money::round(deposit * Decimal::new(95, 2)),
            PaymentMethod::Card => deposit,
        }
    }

    /// Consistency checks that warn instead of failing: authored fixed
    /// amounts are returned as-is even when they do not reconcile, so an
    /// operator can see and fix the package rather than have bookings
    /// silently repriced.
    fn reconcile(&self, split: &mut MoneySplit, package: &TravelPackage) {
        let mut warnings = Vec::new();

        if package.has_fixed_split() {
            let drift = (split.distributed_total() - split.total_price).abs();
            if drift > self.epsilon {
                warnings.push(format!(
                    "fixed split {} does not sum to total {}",
                    money::format_brl(split.distributed_total()),
                    money::format_brl(split.total_price),
                ));
            }
        }

        if split.deposit > split.total_price + self.epsilon {
            warnings.push(format!(
                "deposit {} exceeds total {}",
                money::format_brl(split.deposit),
                money::format_brl(split.total_price),
            ));
        }

        if !warnings.is_empty() {
            let message = warnings.join("; ");
            warn!(
                package_id = %package.id.as_deref().unwrap_or("-"),
                %message,
                "package split inconsistency"
            );
            split.warning = Some(message);
        }
    }
}
