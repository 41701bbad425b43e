use chrono::Utc;
use rust_decimal::Decimal;

use rotatur::modules::packages::TravelPackage;

/// Package in legacy percentage mode: round trip 300, one-way/return 180,
/// 30% deposit.
pub fn percentage_package(id: &str) -> TravelPackage {
    TravelPackage {
        id: Some(id.to_string()),
        title: "Transfer Recife → Porto de Galinhas".to_string(),
        origin: "Recife".to_string(),
        destination: "Porto de Galinhas".to_string(),
        price_one_way: Some(Decimal::from(180)),
        price_return_only: Some(Decimal::from(180)),
        price_round_trip: Some(Decimal::from(300)),
        supports_round_trip: true,
        deposit_amount: None,
        first_leg_payout: None,
        second_leg_payout: None,
        deposit_percentage: Some(Decimal::from(30)),
        active: true,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

/// Package in fixed-split mode: deposit 50, first leg 70, optional second leg.
pub fn fixed_split_package(
    id: &str,
    price_round_trip: Decimal,
    second_leg_payout: Option<Decimal>,
) -> TravelPackage {
    TravelPackage {
        id: Some(id.to_string()),
        title: "Transfer Maragogi com parada".to_string(),
        origin: "Maceió".to_string(),
        destination: "Maragogi".to_string(),
        price_one_way: None,
        price_return_only: None,
        price_round_trip: Some(price_round_trip),
        supports_round_trip: true,
        deposit_amount: Some(Decimal::from(50)),
        first_leg_payout: Some(Decimal::from(70)),
        second_leg_payout,
        deposit_percentage: None,
        active: true,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}
