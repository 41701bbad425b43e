pub mod reservation_controller;

pub use reservation_controller::configure;
