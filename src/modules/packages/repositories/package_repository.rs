use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use crate::core::{AppError, Result};
use crate::modules::packages::models::TravelPackage;

/// Store boundary for travel packages. The MySQL implementation is the
/// production one; tests substitute an in-memory fake.
#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create(&self, package: &TravelPackage) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<TravelPackage>>;
    async fn update(&self, package: &TravelPackage) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<TravelPackage>>;
}

/// MySQL-backed package repository
pub struct MySqlPackageRepository {
    pool: MySqlPool,
}

impl MySqlPackageRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &MySqlRow) -> Result<TravelPackage> {
        Ok(TravelPackage {
            id: Some(row.try_get("id")?),
            title: row.try_get("title")?,
            origin: row.try_get("origin")?,
            destination: row.try_get("destination")?,
            price_one_way: row.try_get("price_one_way")?,
            price_return_only: row.try_get("price_return_only")?,
            price_round_trip: row.try_get("price_round_trip")?,
            supports_round_trip: row.try_get("supports_round_trip")?,
            deposit_amount: row.try_get("deposit_amount")?,
            first_leg_payout: row.try_get("first_leg_payout")?,
            second_leg_payout: row.try_get("second_leg_payout")?,
            deposit_percentage: row.try_get("deposit_percentage")?,
            active: row.try_get("active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn require_id(package: &TravelPackage) -> Result<&str> {
        package
            .id
            .as_deref()
            .ok_or_else(|| AppError::internal("Package has no id"))
    }
}

#[async_trait]
impl PackageRepository for MySqlPackageRepository {
    async fn create(&self, package: &TravelPackage) -> Result<()> {
        // normalize once at the boundary; invalid rows never reach the table
        package.validate()?;
        let id = Self::require_id(package)?;

        sqlx::query(
            r#"
            INSERT INTO travel_packages (
                id, title, origin, destination,
                price_one_way, price_return_only, price_round_trip,
                supports_round_trip, deposit_amount, first_leg_payout,
                second_leg_payout, deposit_percentage, active,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&package.title)
        .bind(&package.origin)
        .bind(&package.destination)
        .bind(package.price_one_way)
        .bind(package.price_return_only)
        .bind(package.price_round_trip)
        .bind(package.supports_round_trip)
        .bind(package.deposit_amount)
        .bind(package.first_leg_payout)
        .bind(package.second_leg_payout)
        .bind(package.deposit_percentage)
        .bind(package.active)
        .bind(package.created_at)
        .bind(package.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TravelPackage>> {
        let row = sqlx::query("SELECT * FROM travel_packages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn update(&self, package: &TravelPackage) -> Result<()> {
        package.validate()?;
        let id = Self::require_id(package)?;

        let result = sqlx::query(
            r#"
            UPDATE travel_packages SET
                title = ?, origin = ?, destination = ?,
                price_one_way = ?, price_return_only = ?, price_round_trip = ?,
                supports_round_trip = ?, deposit_amount = ?, first_leg_payout = ?,
                second_leg_payout = ?, deposit_percentage = ?, active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&package.title)
        .bind(&package.origin)
        .bind(&package.destination)
        .bind(package.price_one_way)
        .bind(package.price_return_only)
        .bind(package.price_round_trip)
        .bind(package.supports_round_trip)
        .bind(package.deposit_amount)
        .bind(package.first_leg_payout)
        .bind(package.second_leg_payout)
        .bind(package.deposit_percentage)
        .bind(package.active)
        .bind(package.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Package {}", id)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM travel_packages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Package {}", id)));
        }

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<TravelPackage>> {
        let rows = sqlx::query(
            "SELECT * FROM travel_packages WHERE active = TRUE \
             ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }
}
