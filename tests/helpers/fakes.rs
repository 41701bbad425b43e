use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use rotatur::core::{AppError, Result};
use rotatur::modules::notifications::{NotificationDispatcher, TemplateVars};
use rotatur::modules::packages::{PackageRepository, TravelPackage};
use rotatur::modules::payments::{
    ChargeRequest, ChargeResponse, ChargeStatus, PaymentEvent, PaymentProvider,
};
use rotatur::modules::reservations::{Reservation, ReservationRepository};

/// In-memory package store for tests
#[derive(Default)]
pub struct InMemoryPackageRepository {
    items: Mutex<HashMap<String, TravelPackage>>,
}

impl InMemoryPackageRepository {
    pub fn with_packages(packages: Vec<TravelPackage>) -> Self {
        let repo = Self::default();
        {
            let mut items = repo.items.lock().unwrap();
            for package in packages {
                items.insert(package.id.clone().unwrap(), package);
            }
        }
        repo
    }
}

#[async_trait]
impl PackageRepository for InMemoryPackageRepository {
    async fn create(&self, package: &TravelPackage) -> Result<()> {
        package.validate()?;
        let id = package
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Package has no id"))?;
        self.items.lock().unwrap().insert(id, package.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TravelPackage>> {
        Ok(self.items.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, package: &TravelPackage) -> Result<()> {
        package.validate()?;
        let id = package
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Package has no id"))?;
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&id) {
            return Err(AppError::not_found(format!("Package {}", id)));
        }
        items.insert(id, package.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Package {}", id)))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<TravelPackage>> {
        let items = self.items.lock().unwrap();
        let mut packages: Vec<_> = items.values().filter(|p| p.active).cloned().collect();
        packages.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        Ok(packages
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

/// In-memory reservation store for tests
#[derive(Default)]
pub struct InMemoryReservationRepository {
    items: Mutex<HashMap<String, Reservation>>,
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, reservation: &Reservation) -> Result<()> {
        let id = reservation
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Reservation has no id"))?;
        self.items.lock().unwrap().insert(id, reservation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>> {
        Ok(self.items.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, reservation: &Reservation) -> Result<()> {
        let id = reservation
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Reservation has no id"))?;
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&id) {
            return Err(AppError::not_found(format!("Reservation {}", id)));
        }
        items.insert(id, reservation.clone());
        Ok(())
    }

    async fn list_by_driver(
        &self,
        driver_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>> {
        Ok(self.filter(limit, offset, |r| {
            r.driver_id.as_deref() == Some(driver_id)
        }))
    }

    async fn list_by_client(
        &self,
        client_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reservation>> {
        Ok(self.filter(limit, offset, |r| r.client_id == client_id))
    }

    async fn list_awaiting_approval(&self, limit: i64, offset: i64) -> Result<Vec<Reservation>> {
        Ok(self.filter(limit, offset, |r| r.awaiting_approval))
    }
}

impl InMemoryReservationRepository {
    fn filter<F>(&self, limit: i64, offset: i64, predicate: F) -> Vec<Reservation>
    where
        F: Fn(&Reservation) -> bool,
    {
        let items = self.items.lock().unwrap();
        let mut reservations: Vec<_> = items.values().filter(|r| predicate(r)).cloned().collect();
        reservations.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        reservations
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }
}

/// Dispatcher that records every delivery for assertions
#[derive(Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<(String, TemplateVars)>>,
}

impl RecordingDispatcher {
    pub fn template_keys(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn last_vars(&self) -> Option<TemplateVars> {
        self.events.lock().unwrap().last().map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, template_key: &str, vars: &TemplateVars) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((template_key.to_string(), vars.clone()));
        Ok(())
    }
}

/// Provider stub: accepts the literal signature "test-signature" and a plain
/// JSON payload `{reservation_id, reference, amount, paid}`.
pub struct StubPaymentProvider;

#[async_trait]
impl PaymentProvider for StubPaymentProvider {
    async fn create_charge(&self, request: ChargeRequest) -> Result<ChargeResponse> {
        Ok(ChargeResponse {
            provider_reference: format!("stub-{}", request.reservation_id),
            checkout_url: "https://pay.example.test/checkout".to_string(),
            status: ChargeStatus::Pending,
        })
    }

    fn verify_webhook(&self, signature: &str, _payload: &str) -> Result<()> {
        if signature != "test-signature" {
            return Err(AppError::validation("Invalid webhook signature"));
        }
        Ok(())
    }

    fn parse_webhook(&self, payload: &str) -> Result<PaymentEvent> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        let paid = value["paid"].as_bool().unwrap_or(false);
        let amount = value["amount"]
            .as_str()
            .and_then(|s| s.parse::<Decimal>().ok())
            .unwrap_or_default();

        Ok(PaymentEvent {
            provider_reference: value["reference"].as_str().unwrap_or("stub").to_string(),
            reservation_id: value["reservation_id"].as_str().unwrap_or("").to_string(),
            amount_paid: amount,
            status: if paid {
                ChargeStatus::Paid
            } else {
                ChargeStatus::Pending
            },
            raw: value,
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}
