// Reservation state machine tests: the happy path, role gating, the
// reject/redo loop, and a randomized action-sequence property proving no
// shortcut into `Approved` exists.

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use rotatur::core::AppError;
use rotatur::modules::pricing::models::{MoneySplit, PaymentMethod, TripSelection, TripType};
use rotatur::modules::reservations::models::{ActorRole, Reservation, ReservationStatus};

fn split() -> MoneySplit {
    MoneySplit {
        total_price: dec!(300),
        deposit: dec!(90),
        deposit_with_method_discount: dec!(85.50),
        first_leg_payout: dec!(105),
        second_leg_payout: dec!(105),
        warning: None,
    }
}

fn reservation() -> Reservation {
    Reservation::new(
        "pkg-1".to_string(),
        "client-1".to_string(),
        TripSelection::new(TripType::RoundTrip, PaymentMethod::Pix),
        split(),
    )
    .unwrap()
}

#[test]
fn test_happy_path_to_approval() {
    let mut r = reservation();

    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    assert_eq!(r.status, ReservationStatus::Delegated);
    assert!(r.delegated_at.is_some());

    r.record_deposit_payment("mp-42");
    r.confirm(ActorRole::Driver).unwrap();
    assert_eq!(r.status, ReservationStatus::Confirmed);

    r.complete(ActorRole::Driver).unwrap();
    assert_eq!(r.status, ReservationStatus::Completed);
    assert!(r.awaiting_approval);
    assert!(r.completed_at.is_some());
    assert!(!r.payout_eligible());

    r.approve(ActorRole::Owner).unwrap();
    assert_eq!(r.status, ReservationStatus::Approved);
    assert!(!r.awaiting_approval);
    assert!(r.payout_eligible());
    assert!(r.is_terminal());
}

#[test]
fn test_pending_to_approved_is_rejected_with_state_names() {
    let mut r = reservation();
    let err = r.approve(ActorRole::Owner).unwrap_err();

    match &err {
        AppError::InvalidTransition { from, requested } => {
            assert_eq!(from, "pending");
            assert_eq!(requested, "approved");
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
}

#[test]
fn test_pending_cannot_complete_directly() {
    let mut r = reservation();
    let err = r.complete(ActorRole::Driver).unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[test]
fn test_confirm_twice_is_silent() {
    let mut r = reservation();
    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.record_deposit_payment("mp-42");
    r.confirm(ActorRole::Driver).unwrap();

    assert!(r.confirm(ActorRole::Driver).is_ok());
    assert_eq!(r.status, ReservationStatus::Confirmed);
}

#[test]
fn test_reject_returns_trip_to_driver_with_reason() {
    let mut r = reservation();
    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.complete(ActorRole::Driver).unwrap();

    r.reject(ActorRole::Owner, "document mismatch").unwrap();

    assert_eq!(r.status, ReservationStatus::Delegated);
    assert!(!r.awaiting_approval);
    assert_eq!(r.rejection_reason.as_deref(), Some("document mismatch"));
}

#[test]
fn test_rejected_trip_can_be_redone_and_approved() {
    let mut r = reservation();
    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.complete(ActorRole::Driver).unwrap();
    r.reject(ActorRole::Owner, "wrong voucher").unwrap();

    r.complete(ActorRole::Driver).unwrap();
    r.approve(ActorRole::Owner).unwrap();
    assert_eq!(r.status, ReservationStatus::Approved);
}

#[test]
fn test_cancel_from_each_open_state() {
    // pending
    let mut r = reservation();
    r.cancel(ActorRole::Client, "changed plans").unwrap();
    assert_eq!(r.status, ReservationStatus::Cancelled);
    assert!(r.is_terminal());
    assert_eq!(r.cancellation_reason.as_deref(), Some("changed plans"));

    // delegated
    let mut r = reservation();
    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.cancel(ActorRole::Owner, "no vehicle available").unwrap();
    assert_eq!(r.status, ReservationStatus::Cancelled);

    // confirmed
    let mut r = reservation();
    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.record_deposit_payment("mp-42");
    r.confirm(ActorRole::Driver).unwrap();
    r.cancel(ActorRole::Driver, "breakdown").unwrap();
    assert_eq!(r.status, ReservationStatus::Cancelled);
}

#[test]
fn test_terminal_states_are_frozen() {
    let mut r = reservation();
    r.cancel(ActorRole::Client, "changed plans").unwrap();
    assert!(r.assign_driver(ActorRole::Owner, "driver-1").is_err());
    assert!(r.cancel(ActorRole::Client, "again").is_err());

    let mut r = reservation();
    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.complete(ActorRole::Driver).unwrap();
    r.approve(ActorRole::Owner).unwrap();
    assert!(r.complete(ActorRole::Driver).is_err());
    assert!(r.cancel(ActorRole::Owner, "too late").is_err());
}

#[test]
fn test_money_snapshot_is_untouched_by_transitions() {
    let mut r = reservation();
    let snapshot = r.split.clone();

    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.record_deposit_payment("mp-42");
    r.confirm(ActorRole::Driver).unwrap();
    r.complete(ActorRole::Driver).unwrap();
    r.approve(ActorRole::Owner).unwrap();

    assert_eq!(r.split, snapshot);
}

#[test]
fn test_archived_after_24_hours() {
    let mut r = reservation();
    r.assign_driver(ActorRole::Owner, "driver-1").unwrap();
    r.complete(ActorRole::Driver).unwrap();
    r.approve(ActorRole::Owner).unwrap();

    let approved_at = r.approved_at.unwrap();
    assert!(!r.is_archived(approved_at + Duration::hours(1)));
    assert!(r.is_archived(approved_at + Duration::hours(25)));
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Assign,
    Pay,
    Confirm,
    Complete,
    Approve,
    Reject,
    Cancel,
}

fn action(index: u8) -> Action {
    match index % 7 {
        0 => Action::Assign,
        1 => Action::Pay,
        2 => Action::Confirm,
        3 => Action::Complete,
        4 => Action::Approve,
        5 => Action::Reject,
        _ => Action::Cancel,
    }
}

fn apply(r: &mut Reservation, a: Action) {
    // outcome intentionally ignored; illegal actions must leave the
    // reservation untouched and that is what the properties check
    let _ = match a {
        Action::Assign => r.assign_driver(ActorRole::Owner, "driver-1"),
        Action::Pay => {
            r.record_deposit_payment("mp-42");
            Ok(())
        }
        Action::Confirm => r.confirm(ActorRole::Driver),
        Action::Complete => r.complete(ActorRole::Driver),
        Action::Approve => r.approve(ActorRole::Owner),
        Action::Reject => r.reject(ActorRole::Owner, "redo"),
        Action::Cancel => r.cancel(ActorRole::Client, "called off"),
    };
}

proptest! {
    /// No sequence of actions, legal or not, reaches `Approved` without
    /// passing through `Completed`, skips `Pending → Completed`, or thaws a
    /// terminal state.
    #[test]
    fn prop_no_shortcuts_through_the_lifecycle(actions in prop::collection::vec(0u8..7, 0..40)) {
        let mut r = reservation();

        for index in actions {
            let before = r.status;
            apply(&mut r, action(index));
            let after = r.status;

            if after == ReservationStatus::Approved && before != ReservationStatus::Approved {
                prop_assert_eq!(before, ReservationStatus::Completed);
                prop_assert!(r.completed_at.is_some());
            }

            if before == ReservationStatus::Pending {
                prop_assert_ne!(after, ReservationStatus::Completed);
                prop_assert_ne!(after, ReservationStatus::Approved);
            }

            if matches!(before, ReservationStatus::Approved | ReservationStatus::Cancelled) {
                prop_assert_eq!(after, before);
            }

            prop_assert_eq!(r.awaiting_approval, after == ReservationStatus::Completed);

            if after == ReservationStatus::Confirmed {
                prop_assert!(r.driver_id.is_some());
            }
        }
    }
}
