use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money;

/// Output of the pricing/split engine.
///
/// Computed on demand and snapshotted onto a reservation at creation time;
/// the snapshot is never recomputed from the package afterwards, so a later
/// price change cannot retroactively alter a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneySplit {
    /// Price for the selected trip type
    pub total_price: Decimal,

    /// Portion paid up front to the agency (the "sinal")
    pub deposit: Decimal,

    /// Deposit after the Pix discount, equal to `deposit` for card payments
    pub deposit_with_method_discount: Decimal,

    /// Driver amount for the outbound leg
    pub first_leg_payout: Decimal,

    /// Driver amount for the return leg, zero unless the trip is round-trip
    pub second_leg_payout: Decimal,

    /// Set when the authored fixed amounts do not reconcile with the total.
    /// The values above are still the authored ones; nothing is corrected
    /// silently.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

impl MoneySplit {
    /// Deposit plus both driver payouts
    pub fn distributed_total(&self) -> Decimal {
        self.deposit + self.first_leg_payout + self.second_leg_payout
    }

    /// Whether the split reconciles with the total within one cent
    pub fn sums_to_total(&self) -> bool {
        (self.distributed_total() - self.total_price).abs() <= money::one_cent()
    }
}
