// Package catalog module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{PackagePayload, TravelPackage};
pub use repositories::{MySqlPackageRepository, PackageRepository};
pub use services::PackageService;
