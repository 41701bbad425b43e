use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::packages::models::{PackagePayload, TravelPackage};
use crate::modules::packages::repositories::PackageRepository;
use crate::modules::pricing::models::{MoneySplit, TripSelection, TripType};
use crate::modules::pricing::services::SplitEngine;

/// Business logic for the package catalog and pricing queries
pub struct PackageService {
    packages: Arc<dyn PackageRepository>,
    engine: SplitEngine,
}

impl PackageService {
    pub fn new(packages: Arc<dyn PackageRepository>, engine: SplitEngine) -> Self {
        Self { packages, engine }
    }

    pub async fn create_package(&self, payload: PackagePayload) -> Result<TravelPackage> {
        let package = TravelPackage::from_payload(payload)?;
        self.packages.create(&package).await?;

        info!(
            package_id = %package.id.as_deref().unwrap_or("-"),
            title = %package.title,
            "package created"
        );

        Ok(package)
    }

    pub async fn get_package(&self, id: &str) -> Result<TravelPackage> {
        self.packages
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Package {}", id)))
    }

    pub async fn list_packages(&self, limit: i64, offset: i64) -> Result<Vec<TravelPackage>> {
        self.packages.list(limit, offset).await
    }

    pub async fn update_package(&self, id: &str, payload: PackagePayload) -> Result<TravelPackage> {
        let mut package = self.get_package(id).await?;
        package.apply_payload(payload)?;
        self.packages.update(&package).await?;
        Ok(package)
    }

    pub async fn delete_package(&self, id: &str) -> Result<()> {
        self.packages.delete(id).await
    }

    /// Price a selection against a package. Always computed fresh; only
    /// reservations hold snapshots.
    pub async fn quote(&self, id: &str, selection: TripSelection) -> Result<MoneySplit> {
        let package = self.get_package(id).await?;
        self.engine.compute_split(&package, &selection)
    }

    /// The owner panel's "auto divide" helper: the full price for the given
    /// trip type cut into three equal parts, no deposit involved.
    pub async fn auto_divide(&self, id: &str, trip_type: TripType) -> Result<[Decimal; 3]> {
        let package = self.get_package(id).await?;
        let total = package.price_for(trip_type)?;
        self.engine.equal_thirds_auto_divide(total)
    }
}
