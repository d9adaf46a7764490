use chrono::{DateTime, Local, LocalResult, NaiveDate, TimeZone};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::SchedulingApi;
use crate::error::SchedulingError;
use crate::models::{BookingOutcome, BookingRequest};
use crate::services::fetcher::AvailabilityState;
use crate::services::selection::SelectionState;

/// The single user-facing failure reason; transport causes are not told apart.
pub const BOOKING_FAILED_REASON: &str =
    "An error occurred while creating the appointment, please try again";

/// Sends create-appointment requests, at most one at a time.
pub struct BookingSubmitter {
    api: Arc<dyn SchedulingApi>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the submission finishes or is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BookingSubmitter {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Builds the request for the current selection, checking that an hour is
    /// chosen and that it is available in the table loaded for the selection.
    pub fn build_request(
        selection: &SelectionState,
        availability: &AvailabilityState,
    ) -> Result<BookingRequest, SchedulingError> {
        let hour = selection.hour().ok_or(SchedulingError::NoHourSelected)?;

        let table = match availability {
            AvailabilityState::Loaded(table) if *table.key() == selection.key() => table,
            _ => return Err(SchedulingError::AvailabilityNotLoaded),
        };

        if !table.is_available(hour) {
            return Err(SchedulingError::SlotNotAvailable { hour });
        }

        let scheduled_at = local_timestamp(selection.date(), hour)?;

        Ok(BookingRequest {
            provider_id: selection.provider_id().to_string(),
            scheduled_at,
        })
    }

    /// Issues exactly one create call. Contract violations come back as
    /// `Err`; every remote failure becomes `BookingOutcome::Failed`.
    pub async fn submit(
        &self,
        selection: &SelectionState,
        availability: &AvailabilityState,
    ) -> Result<BookingOutcome, SchedulingError> {
        let request = Self::build_request(selection, availability)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SchedulingError::SubmissionInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        info!(
            "Submitting appointment with provider {} at {}",
            request.provider_id,
            request.iso_timestamp()
        );

        match self.api.create_appointment(&request).await {
            Ok(created) => {
                info!("Appointment created (id: {:?})", created.id);
                Ok(BookingOutcome::Created {
                    appointment_id: created.id,
                    scheduled_at: request.scheduled_at,
                })
            }
            Err(e) => {
                error!("Failed to create appointment: {}", e);
                Ok(BookingOutcome::Failed {
                    reason: BOOKING_FAILED_REASON.to_string(),
                })
            }
        }
    }
}

/// `date` at `hour`:00:00 in the local timezone.
pub fn local_timestamp(date: NaiveDate, hour: i32) -> Result<DateTime<Local>, SchedulingError> {
    local_timestamp_in(&Local, date, hour)
}

/// `date` at `hour`:00:00 as wall-clock time in `tz`. Ambiguous times resolve
/// to the earlier instant; times skipped by a DST jump are rejected.
pub fn local_timestamp_in<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    hour: i32,
) -> Result<DateTime<Tz>, SchedulingError> {
    let invalid = || SchedulingError::InvalidLocalTime { date, hour };

    let hour_u32 = u32::try_from(hour).map_err(|_| invalid())?;
    let naive = date.and_hms_opt(hour_u32, 0, 0).ok_or_else(invalid)?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(invalid()),
    }
}
