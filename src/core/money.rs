use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for BRL amounts
pub const SCALE: u32 = 2;

/// One cent, the tolerance used when checking that a split sums to its total
pub fn one_cent() -> Decimal {
    Decimal::new(1, SCALE)
}

/// Rounds a monetary amount to 2 decimal places.
///
/// Rounding is half-away-from-zero (R$ 0.005 becomes R$ 0.01), matching how
/// the agency quotes prices to customers. Not banker's rounding.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Validates that an authored amount is usable: non-negative, at most 2
/// decimal places.
pub fn validate_amount(field: &str, amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("{} cannot be negative", field));
    }

    if amount.scale() > SCALE {
        return Err(format!(
            "{} must have at most {} decimal places, got {}",
            field,
            SCALE,
            amount.scale()
        ));
    }

    Ok(())
}

/// Formats an amount for display and notification templates, e.g. "R$ 105.00"
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {:.2}", amount)
}
