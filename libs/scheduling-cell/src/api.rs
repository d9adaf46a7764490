use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde_json::json;
use tracing::debug;

use shared_api::ApiClient;
use shared_models::AppError;

use crate::models::{AvailabilitySlot, BookingRequest, CreatedAppointment, Provider};

/// The three remote calls the scheduling core depends on.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    async fn list_providers(&self) -> Result<Vec<Provider>, AppError>;

    async fn fetch_day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AppError>;

    async fn create_appointment(
        &self,
        request: &BookingRequest,
    ) -> Result<CreatedAppointment, AppError>;
}

/// `SchedulingApi` over the booking HTTP API.
#[derive(Clone)]
pub struct HttpSchedulingApi {
    client: ApiClient,
}

impl HttpSchedulingApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SchedulingApi for HttpSchedulingApi {
    async fn list_providers(&self) -> Result<Vec<Provider>, AppError> {
        debug!("Fetching provider list");
        self.client.get("/providers", &[]).await
    }

    async fn fetch_day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AppError> {
        debug!("Fetching day availability for provider {} on {}", provider_id, date);

        let path = format!(
            "/providers/{}/day-availability",
            urlencoding::encode(provider_id)
        );
        let query = [
            ("year", date.year().to_string()),
            ("month", date.month().to_string()),
            ("day", date.day().to_string()),
        ];

        self.client.get(&path, &query).await
    }

    async fn create_appointment(
        &self,
        request: &BookingRequest,
    ) -> Result<CreatedAppointment, AppError> {
        debug!(
            "Creating appointment with provider {} at {}",
            request.provider_id,
            request.iso_timestamp()
        );

        self.client
            .post(
                "/appointments",
                json!({
                    "provider_id": request.provider_id,
                    "date": request.iso_timestamp(),
                }),
            )
            .await
    }
}
