// Pricing module: trip selection types, the money split, and the engine
// that derives deposits and per-leg driver payouts.

pub mod models;
pub mod services;

pub use models::{MoneySplit, PaymentMethod, TripSelection, TripType};
pub use services::SplitEngine;
