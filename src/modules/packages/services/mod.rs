pub mod package_service;

pub use package_service::PackageService;
