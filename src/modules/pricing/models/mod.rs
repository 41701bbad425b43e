pub mod money_split;
pub mod trip;

pub use money_split::MoneySplit;
pub use trip::{PaymentMethod, TripSelection, TripType};
