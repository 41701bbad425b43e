use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::notifications::TemplateVars;
use crate::modules::pricing::models::{MoneySplit, PaymentMethod, TripSelection, TripType};

/// Reservation status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Created by the client, no driver assigned yet
    Pending,

    /// Driver assigned by the owner
    Delegated,

    /// Driver accepted the trip; deposit evidence is required to get here
    Confirmed,

    /// Driver marked the trip done, awaiting the owner's financial approval
    Completed,

    /// Owner reconciled the trip; payout released. Terminal.
    Approved,

    /// Called off by any party. Terminal.
    Cancelled,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Delegated => write!(f, "delegated"),
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::Completed => write!(f, "completed"),
            ReservationStatus::Approved => write!(f, "approved"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "delegated" => Ok(ReservationStatus::Delegated),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "completed" => Ok(ReservationStatus::Completed),
            "approved" => Ok(ReservationStatus::Approved),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

/// Who is acting on a reservation. Transitions are role-gated; the panels
/// send the role alongside the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Client,
    Driver,
    Owner,
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRole::Client => write!(f, "client"),
            ActorRole::Driver => write!(f, "driver"),
            ActorRole::Owner => write!(f, "owner"),
        }
    }
}

/// A booking instance with lifecycle state.
///
/// The money split is a snapshot taken when the reservation is created;
/// package price edits after that point never reprice an existing booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation ID (UUID)
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    pub package_id: String,
    pub client_id: String,

    /// Assigned driver, set on delegation
    pub driver_id: Option<String>,

    pub trip_type: TripType,
    pub payment_method: PaymentMethod,

    /// Money snapshot from creation time
    pub split: MoneySplit,

    pub status: ReservationStatus,

    /// True between "driver marks done" and the owner's approve/reject
    pub awaiting_approval: bool,

    pub rejection_reason: Option<String>,
    pub cancellation_reason: Option<String>,

    /// Provider reference for the deposit charge, recorded with the evidence
    pub payment_reference: Option<String>,

    /// When the deposit was confirmed paid by the provider
    pub deposit_paid_at: Option<DateTime<Utc>>,

    // one timestamp per transition taken
    pub delegated_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Create a new reservation with its money snapshot
    pub fn new(
        package_id: String,
        client_id: String,
        selection: TripSelection,
        split: MoneySplit,
    ) -> Result<Self> {
        if package_id.trim().is_empty() {
            return Err(AppError::validation("Package ID cannot be empty"));
        }

        if client_id.trim().is_empty() {
            return Err(AppError::validation("Client ID cannot be empty"));
        }

        let now = Utc::now();

        Ok(Self {
            id: Some(Uuid::new_v4().to_string()),
            package_id,
            client_id,
            driver_id: None,
            trip_type: selection.trip_type,
            payment_method: selection.payment_method,
            split,
            status: ReservationStatus::Pending,
            awaiting_approval: false,
            rejection_reason: None,
            cancellation_reason: None,
            payment_reference: None,
            deposit_paid_at: None,
            delegated_at: None,
            confirmed_at: None,
            completed_at: None,
            approved_at: None,
            cancelled_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    /// Owner assigns (or re-assigns) a driver. `Pending → Delegated`.
    pub fn assign_driver(&mut self, actor: ActorRole, driver_id: &str) -> Result<()> {
        if actor != ActorRole::Owner {
            return Err(AppError::forbidden("Only the owner may assign a driver"));
        }

        if driver_id.trim().is_empty() {
            return Err(AppError::validation("Driver ID cannot be empty"));
        }

        match self.status {
            ReservationStatus::Pending | ReservationStatus::Delegated => {
                self.driver_id = Some(driver_id.to_string());
                self.status = ReservationStatus::Delegated;
                self.delegated_at = Some(Utc::now());
                self.touch();
                Ok(())
            }
            _ => Err(self.transition_error(ReservationStatus::Delegated)),
        }
    }

    /// Driver accepts the trip. `Pending/Delegated → Confirmed`, a no-op when
    /// already confirmed. Requires an assigned driver and paid-deposit
    /// evidence.
    pub fn confirm(&mut self, actor: ActorRole) -> Result<()> {
        if actor != ActorRole::Driver {
            return Err(AppError::forbidden("Only the driver may confirm a trip"));
        }

        match self.status {
            ReservationStatus::Confirmed => Ok(()),
            ReservationStatus::Pending | ReservationStatus::Delegated => {
                if self.driver_id.is_none() {
                    return Err(AppError::missing_driver(
                        "Cannot confirm a reservation with no assigned driver",
                    ));
                }

                if self.deposit_paid_at.is_none() {
                    return Err(AppError::validation(
                        "Deposit has not been paid; confirmation is blocked",
                    ));
                }

                self.status = ReservationStatus::Confirmed;
                self.confirmed_at = Some(Utc::now());
                self.touch();
                Ok(())
            }
            _ => Err(self.transition_error(ReservationStatus::Confirmed)),
        }
    }

    /// Driver marks the trip done. `Delegated/Confirmed → Completed`.
    pub fn complete(&mut self, actor: ActorRole) -> Result<()> {
        if actor != ActorRole::Driver {
            return Err(AppError::forbidden("Only the driver may complete a trip"));
        }

        match self.status {
            ReservationStatus::Delegated | ReservationStatus::Confirmed => {
                if self.driver_id.is_none() {
                    return Err(AppError::missing_driver(
                        "Cannot complete a reservation with no assigned driver",
                    ));
                }

                self.status = ReservationStatus::Completed;
                self.awaiting_approval = true;
                self.completed_at = Some(Utc::now());
                self.touch();
                Ok(())
            }
            _ => Err(self.transition_error(ReservationStatus::Completed)),
        }
    }

    /// Owner reconciles and releases the payout. `Completed → Approved`.
    /// Terminal.
    pub fn approve(&mut self, actor: ActorRole) -> Result<()> {
        if actor != ActorRole::Owner {
            return Err(AppError::forbidden("Only the owner may approve a trip"));
        }

        match self.status {
            ReservationStatus::Completed => {
                self.status = ReservationStatus::Approved;
                self.awaiting_approval = false;
                self.approved_at = Some(Utc::now());
                self.touch();
                Ok(())
            }
            _ => Err(self.transition_error(ReservationStatus::Approved)),
        }
    }

    /// Owner sends the trip back to the driver. `Completed → Confirmed` when
    /// the driver had confirmed, `Completed → Delegated` otherwise.
    pub fn reject(&mut self, actor: ActorRole, reason: &str) -> Result<()> {
        if actor != ActorRole::Owner {
            return Err(AppError::forbidden("Only the owner may reject a trip"));
        }

        if reason.trim().is_empty() {
            return Err(AppError::validation("Rejection requires a reason"));
        }

        match self.status {
            ReservationStatus::Completed => {
                self.status = if self.confirmed_at.is_some() {
                    ReservationStatus::Confirmed
                } else {
                    ReservationStatus::Delegated
                };
                self.awaiting_approval = false;
                self.rejection_reason = Some(reason.trim().to_string());
                self.touch();
                Ok(())
            }
            _ => Err(self.transition_error(ReservationStatus::Delegated)),
        }
    }

    /// Any party calls the trip off. `Pending/Delegated/Confirmed →
    /// Cancelled`. Terminal. A completed trip cannot be cancelled around the
    /// approval step; the owner rejects it instead.
    pub fn cancel(&mut self, _actor: ActorRole, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(AppError::validation("Cancellation requires a reason"));
        }

        match self.status {
            ReservationStatus::Pending
            | ReservationStatus::Delegated
            | ReservationStatus::Confirmed => {
                self.status = ReservationStatus::Cancelled;
                self.cancellation_reason = Some(reason.trim().to_string());
                self.cancelled_at = Some(Utc::now());
                self.touch();
                Ok(())
            }
            _ => Err(self.transition_error(ReservationStatus::Cancelled)),
        }
    }

    /// Record paid-deposit evidence from the payment provider. Idempotent;
    /// the first evidence wins when webhooks repeat.
    pub fn record_deposit_payment(&mut self, provider_reference: &str) {
        if self.deposit_paid_at.is_some() {
            return;
        }

        self.payment_reference = Some(provider_reference.to_string());
        self.deposit_paid_at = Some(Utc::now());
        self.touch();
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Approved | ReservationStatus::Cancelled
        )
    }

    /// Driver payout may be released only after approval
    pub fn payout_eligible(&self) -> bool {
        self.status == ReservationStatus::Approved
    }

    /// Display-only: approved more than 24 hours ago. Derived from
    /// `approved_at`, never stored.
    pub fn is_archived(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Approved
            && self
                .approved_at
                .map(|t| now - t > Duration::hours(24))
                .unwrap_or(false)
    }

    /// Variables handed to the notification dispatcher. Money always comes
    /// from the snapshot.
    pub fn template_vars(&self) -> TemplateVars {
        use crate::core::money::format_brl;

        let mut vars = TemplateVars::new();
        vars.insert("status".to_string(), self.status.to_string());
        vars.insert("trip_type".to_string(), self.trip_type.to_string());
        vars.insert(
            "total_price".to_string(),
            format_brl(self.split.total_price),
        );
        vars.insert("deposit".to_string(), format_brl(self.split.deposit));
        vars.insert(
            "deposit_due".to_string(),
            format_brl(self.split.deposit_with_method_discount),
        );
        vars.insert(
            "first_leg_payout".to_string(),
            format_brl(self.split.first_leg_payout),
        );
        vars.insert(
            "second_leg_payout".to_string(),
            format_brl(self.split.second_leg_payout),
        );
        if let Some(reason) = &self.rejection_reason {
            vars.insert("rejection_reason".to_string(), reason.clone());
        }
        if let Some(reason) = &self.cancellation_reason {
            vars.insert("cancellation_reason".to_string(), reason.clone());
        }
        vars
    }

    fn transition_error(&self, requested: ReservationStatus) -> AppError {
        AppError::invalid_transition(self.status.to_string(), requested.to_string())
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
