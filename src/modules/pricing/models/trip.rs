use serde::{Deserialize, Serialize};

/// Itinerary shape the customer is buying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    /// Single outbound leg
    OneWay,

    /// Single return leg (customer already at the destination)
    ReturnOnly,

    /// Outbound and return legs, each with its own driver payout
    RoundTrip,
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripType::OneWay => write!(f, "one_way"),
            TripType::ReturnOnly => write!(f, "return_only"),
            TripType::RoundTrip => write!(f, "round_trip"),
        }
    }
}

impl std::str::FromStr for TripType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "one_way" => Ok(TripType::OneWay),
            "return_only" => Ok(TripType::ReturnOnly),
            "round_trip" => Ok(TripType::RoundTrip),
            _ => Err(format!("Invalid trip type: {}", s)),
        }
    }
}

/// How the customer pays the deposit. Pix carries a 5% discount on the
/// deposit only, never on the full price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Card,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Pix => write!(f, "pix"),
            PaymentMethod::Card => write!(f, "card"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pix" => Ok(PaymentMethod::Pix),
            "card" => Ok(PaymentMethod::Card),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// A customer's chosen itinerary instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TripSelection {
    pub trip_type: TripType,
    pub payment_method: PaymentMethod,
}

impl TripSelection {
    pub fn new(trip_type: TripType, payment_method: PaymentMethod) -> Self {
        Self {
            trip_type,
            payment_method,
        }
    }
}
