pub mod package_controller;

pub use package_controller::configure;
