// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

// ==============================================================================
// PROVIDERS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

// ==============================================================================
// AVAILABILITY
// ==============================================================================

/// One hour of a provider's day as reported by the server. The hour is kept
/// as reported, even outside 0..=23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub hour: i32,
    pub available: bool,
}

impl AvailabilitySlot {
    pub fn new(hour: i32, available: bool) -> Self {
        Self { hour, available }
    }
}

/// Identifies which availability table is current: the (provider, date) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvailabilityKey {
    pub provider_id: String,
    pub date: NaiveDate,
}

impl AvailabilityKey {
    pub fn new(provider_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            provider_id: provider_id.into(),
            date,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month, 1-based.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

impl fmt::Display for AvailabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.provider_id, self.date)
    }
}

/// A day's bookable hours for one provider. Built fresh from every
/// successful fetch and never merged with an earlier table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityTable {
    key: AvailabilityKey,
    slots: Vec<AvailabilitySlot>,
}

impl AvailabilityTable {
    /// Keeps the server's ordering. Repeated hours keep their first entry.
    pub fn new(key: AvailabilityKey, slots: Vec<AvailabilitySlot>) -> Self {
        let mut seen = HashSet::with_capacity(slots.len());
        let total = slots.len();
        let slots: Vec<AvailabilitySlot> = slots
            .into_iter()
            .filter(|slot| seen.insert(slot.hour))
            .collect();

        if slots.len() != total {
            warn!(
                "Dropped {} duplicate hour entries from availability for {}",
                total - slots.len(),
                key
            );
        }

        Self { key, slots }
    }

    pub fn key(&self) -> &AvailabilityKey {
        &self.key
    }

    pub fn slots(&self) -> &[AvailabilitySlot] {
        &self.slots
    }

    pub fn slot(&self, hour: i32) -> Option<&AvailabilitySlot> {
        self.slots.iter().find(|slot| slot.hour == hour)
    }

    pub fn is_available(&self, hour: i32) -> bool {
        self.slot(hour).map(|slot| slot.available).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ==============================================================================
// DERIVED SLOT VIEWS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub hour: i32,
    pub available: bool,
    pub display_label: String,
    pub selected: bool,
}

/// A day split at noon, each half in the order the server sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub morning: Vec<TimeSlot>,
    pub afternoon: Vec<TimeSlot>,
}

impl DaySchedule {
    /// Flags the slot matching `hour` as selected, clearing any other flag.
    pub fn with_selected(mut self, hour: Option<i32>) -> Self {
        for slot in self.morning.iter_mut().chain(self.afternoon.iter_mut()) {
            slot.selected = Some(slot.hour) == hour;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty()
    }
}

// ==============================================================================
// BOOKING
// ==============================================================================

/// The create-appointment payload, derived from a validated selection at
/// submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub provider_id: String,
    pub scheduled_at: DateTime<Local>,
}

impl BookingRequest {
    /// RFC 3339 rendering carrying the local offset, e.g.
    /// `2024-03-15T09:00:00-03:00`.
    pub fn iso_timestamp(&self) -> String {
        self.scheduled_at.to_rfc3339()
    }
}

/// Record returned by the server after an appointment is created. Only the
/// fields the client reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedAppointment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Created {
        appointment_id: Option<String>,
        scheduled_at: DateTime<Local>,
    },
    Failed {
        reason: String,
    },
}

impl BookingOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, BookingOutcome::Created { .. })
    }

    /// Epoch milliseconds handed to the confirmation screen.
    pub fn confirmation_millis(&self) -> Option<i64> {
        match self {
            BookingOutcome::Created { scheduled_at, .. } => Some(scheduled_at.timestamp_millis()),
            BookingOutcome::Failed { .. } => None,
        }
    }
}
