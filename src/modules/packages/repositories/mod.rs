pub mod package_repository;

pub use package_repository::{MySqlPackageRepository, PackageRepository};
