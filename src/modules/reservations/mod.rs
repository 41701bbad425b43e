// Reservation lifecycle module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{ActorRole, Reservation, ReservationStatus};
pub use repositories::{MySqlReservationRepository, ReservationRepository};
pub use services::{CreateReservationRequest, ReservationService};
