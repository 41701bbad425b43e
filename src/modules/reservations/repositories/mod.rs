pub mod reservation_repository;

pub use reservation_repository::{MySqlReservationRepository, ReservationRepository};
