pub mod reservation;

pub use reservation::{ActorRole, Reservation, ReservationStatus};
