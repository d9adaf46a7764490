use thiserror::Error;

use shared_models::AppError;

/// Contract violations raised by the scheduling core. Transport failures
/// during submission are not errors here; they become `BookingOutcome::Failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("No hour selected: pick a time slot before submitting")]
    NoHourSelected,

    #[error("Hour {hour} is not available for the selected provider and date")]
    SlotNotAvailable { hour: i32 },

    #[error("Availability for the selected provider and date has not been loaded")]
    AvailabilityNotLoaded,

    #[error("A booking submission is already in flight")]
    SubmissionInFlight,

    #[error("{date} {hour}:00 is not a valid local time")]
    InvalidLocalTime { date: chrono::NaiveDate, hour: i32 },

    #[error(transparent)]
    Api(#[from] AppError),
}
