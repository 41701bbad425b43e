pub mod package;

pub use package::{PackagePayload, TravelPackage};
