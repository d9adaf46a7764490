#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use scheduling_cell::{
    AvailabilitySlot, BookingRequest, CreatedAppointment, Provider, SchedulingApi,
};
use shared_config::{AppConfig, DatePickerBehavior};
use shared_models::{AppError, User};

pub type AvailabilityReply = Result<Vec<AvailabilitySlot>, AppError>;

/// In-memory `SchedulingApi` whose availability replies can be held back and
/// released in any order.
#[derive(Default)]
pub struct FakeApi {
    providers: Vec<Provider>,
    availability: Mutex<HashMap<(String, NaiveDate), Vec<AvailabilitySlot>>>,
    gates: Mutex<HashMap<(String, NaiveDate), oneshot::Receiver<AvailabilityReply>>>,
    created: Mutex<Vec<BookingRequest>>,
    create_gate: Mutex<Option<oneshot::Receiver<()>>>,
    availability_calls: AtomicUsize,
    fail_availability: AtomicBool,
    fail_create: AtomicBool,
}

impl FakeApi {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self {
            providers,
            ..Self::default()
        }
    }

    pub fn with_availability(
        self,
        provider_id: &str,
        date: NaiveDate,
        slots: &[(i32, bool)],
    ) -> Self {
        self.availability.lock().unwrap().insert(
            (provider_id.to_string(), date),
            slots.iter().map(|&(h, a)| AvailabilitySlot::new(h, a)).collect(),
        );
        self
    }

    /// The next availability call for this key waits until the returned
    /// sender is used.
    pub fn gate_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> oneshot::Sender<AvailabilityReply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert((provider_id.to_string(), date), rx);
        tx
    }

    /// The next create call waits until the returned sender is used.
    pub fn gate_create(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.create_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn set_fail_availability(&self, fail: bool) {
        self.fail_availability.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<BookingRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchedulingApi for FakeApi {
    async fn list_providers(&self) -> Result<Vec<Provider>, AppError> {
        Ok(self.providers.clone())
    }

    async fn fetch_day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AppError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        let key = (provider_id.to_string(), date);

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(rx) = gate {
            return rx
                .await
                .unwrap_or_else(|_| Err(AppError::Network("gate dropped".into())));
        }

        if self.fail_availability.load(Ordering::SeqCst) {
            return Err(AppError::ExternalService("(500) availability down".into()));
        }

        Ok(self.availability.lock().unwrap().get(&key).cloned().unwrap_or_default())
    }

    async fn create_appointment(
        &self,
        request: &BookingRequest,
    ) -> Result<CreatedAppointment, AppError> {
        let gate = self.create_gate.lock().unwrap().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::Conflict("slot already taken".into()));
        }

        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        Ok(CreatedAppointment {
            id: Some(format!("appointment-{}", created.len())),
            date: Some(request.iso_timestamp()),
        })
    }
}

pub fn provider(id: &str, name: &str) -> Provider {
    Provider {
        id: id.to_string(),
        display_name: name.to_string(),
        avatar_url: None,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn test_user() -> User {
    User::new("user-1", "Test User")
}

pub fn test_config(behavior: DatePickerBehavior) -> AppConfig {
    AppConfig {
        api_base_url: "http://localhost:3333".to_string(),
        api_timeout: None,
        avatar_fallback_base_url: "https://avatars.example.com/285".to_string(),
        date_picker_behavior: behavior,
        ..AppConfig::default()
    }
}
