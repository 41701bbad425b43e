use std::str::FromStr;

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use crate::core::{AppError, Result};
use crate::modules::pricing::models::{MoneySplit, PaymentMethod, TripType};
use crate::modules::reservations::models::{Reservation, ReservationStatus};

/// Store boundary for reservations. Single-document reads and writes,
/// last-write-wins; cross-document consistency is the store's problem,
/// not this layer's.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn create(&self, reservation: &Reservation) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>>;
    async fn update(&self, reservation: &Reservation) -> Result<()>;
    async fn list_by_driver(
        &self,
        driver_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>>;
    async fn list_by_client(
        &self,
        client_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>>;
    async fn list_awaiting_approval(&self, limit: i64, offset: i64) -> Result<Vec<Reservation>>;
}

/// MySQL-backed reservation repository. The money snapshot is flattened into
/// columns so the owner panel can query on amounts directly.
pub struct MySqlReservationRepository {
    pool: MySqlPool,
}

impl MySqlReservationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &MySqlRow) -> Result<Reservation> {
        let status: String = row.try_get("status")?;
        let trip_type: String = row.try_get("trip_type")?;
        let payment_method: String = row.try_get("payment_method")?;

        Ok(Reservation {
            id: Some(row.try_get("id")?),
            package_id: row.try_get("package_id")?,
            client_id: row.try_get("client_id")?,
            driver_id: row.try_get("driver_id")?,
            trip_type: TripType::from_str(&trip_type).map_err(AppError::Internal)?,
            payment_method: PaymentMethod::from_str(&payment_method).map_err(AppError::Internal)?,
            split: MoneySplit {
                total_price: row.try_get("total_price")?,
                deposit: row.try_get("deposit")?,
                deposit_with_method_discount: row.try_get("deposit_with_method_discount")?,
                first_leg_payout: row.try_get("first_leg_payout")?,
                second_leg_payout: row.try_get("second_leg_payout")?,
                warning: row.try_get("split_warning")?,
            },
            status: ReservationStatus::from_str(&status).map_err(AppError::Internal)?,
            awaiting_approval: row.try_get("awaiting_approval")?,
            rejection_reason: row.try_get("rejection_reason")?,
            cancellation_reason: row.try_get("cancellation_reason")?,
            payment_reference: row.try_get("payment_reference")?,
            deposit_paid_at: row.try_get("deposit_paid_at")?,
            delegated_at: row.try_get("delegated_at")?,
            confirmed_at: row.try_get("confirmed_at")?,
            completed_at: row.try_get("completed_at")?,
            approved_at: row.try_get("approved_at")?,
            cancelled_at: row.try_get("cancelled_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn require_id(reservation: &Reservation) -> Result<&str> {
        reservation
            .id
            .as_deref()
            .ok_or_else(|| AppError::internal("Reservation has no id"))
    }
}

#[async_trait]
impl ReservationRepository for MySqlReservationRepository {
    async fn create(&self, reservation: &Reservation) -> Result<()> {
        let id = Self::require_id(reservation)?;

        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, package_id, client_id, driver_id,
                trip_type, payment_method,
                total_price, deposit, deposit_with_method_discount,
                first_leg_payout, second_leg_payout, split_warning,
                status, awaiting_approval,
                rejection_reason, cancellation_reason,
                payment_reference, deposit_paid_at,
                delegated_at, confirmed_at, completed_at, approved_at, cancelled_at,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&reservation.package_id)
        .bind(&reservation.client_id)
        .bind(&reservation.driver_id)
        .bind(reservation.trip_type.to_string())
        .bind(reservation.payment_method.to_string())
        .bind(reservation.split.total_price)
        .bind(reservation.split.deposit)
        .bind(reservation.split.deposit_with_method_discount)
        .bind(reservation.split.first_leg_payout)
        .bind(reservation.split.second_leg_payout)
        .bind(&reservation.split.warning)
        .bind(reservation.status.to_string())
        .bind(reservation.awaiting_approval)
        .bind(&reservation.rejection_reason)
        .bind(&reservation.cancellation_reason)
        .bind(&reservation.payment_reference)
        .bind(reservation.deposit_paid_at)
        .bind(reservation.delegated_at)
        .bind(reservation.confirmed_at)
        .bind(reservation.completed_at)
        .bind(reservation.approved_at)
        .bind(reservation.cancelled_at)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>> {
        let row = sqlx::query("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn update(&self, reservation: &Reservation) -> Result<()> {
        let id = Self::require_id(reservation)?;

        let result = sqlx::query(
            r#"
            UPDATE reservations SET
                driver_id = ?, status = ?, awaiting_approval = ?,
                rejection_reason = ?, cancellation_reason = ?,
                payment_reference = ?, deposit_paid_at = ?,
                delegated_at = ?, confirmed_at = ?, completed_at = ?,
                approved_at = ?, cancelled_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&reservation.driver_id)
        .bind(reservation.status.to_string())
        .bind(reservation.awaiting_approval)
        .bind(&reservation.rejection_reason)
        .bind(&reservation.cancellation_reason)
        .bind(&reservation.payment_reference)
        .bind(reservation.deposit_paid_at)
        .bind(reservation.delegated_at)
        .bind(reservation.confirmed_at)
        .bind(reservation.completed_at)
        .bind(reservation.approved_at)
        .bind(reservation.cancelled_at)
        .bind(reservation.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Reservation {}", id)));
        }

        Ok(())
    }

    async fn list_by_driver(
        &self,
        driver_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT * FROM reservations WHERE driver_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(driver_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_by_client(
        &self,
        client_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT * FROM reservations WHERE client_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_awaiting_approval(&self, limit: i64, offset: i64) -> Result<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT * FROM reservations WHERE awaiting_approval = TRUE \
             ORDER BY completed_at ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }
}
