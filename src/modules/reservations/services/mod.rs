pub mod reservation_service;

pub use reservation_service::{CreateReservationRequest, ReservationService};
