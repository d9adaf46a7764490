use chrono::NaiveDate;
use tracing::debug;

use shared_config::DatePickerBehavior;

use crate::models::AvailabilityKey;

/// The user's in-progress choice of provider, date and hour for one booking
/// screen.
///
/// Changing the provider or the date always clears the hour: an hour picked
/// against one availability table means nothing against another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    provider_id: String,
    date: NaiveDate,
    hour: Option<i32>,
    date_picker_open: bool,
    picker_behavior: DatePickerBehavior,
}

impl SelectionState {
    pub fn new(
        provider_id: impl Into<String>,
        date: NaiveDate,
        picker_behavior: DatePickerBehavior,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            date,
            hour: None,
            date_picker_open: false,
            picker_behavior,
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> Option<i32> {
        self.hour
    }

    pub fn is_date_picker_open(&self) -> bool {
        self.date_picker_open
    }

    pub fn picker_behavior(&self) -> DatePickerBehavior {
        self.picker_behavior
    }

    pub fn key(&self) -> AvailabilityKey {
        AvailabilityKey::new(self.provider_id.clone(), self.date)
    }

    /// Returns whether the availability key changed.
    pub fn select_provider(&mut self, provider_id: impl Into<String>) -> bool {
        let provider_id = provider_id.into();
        let changed = provider_id != self.provider_id;

        debug!("Selecting provider {} (changed: {})", provider_id, changed);
        self.provider_id = provider_id;
        self.hour = None;

        changed
    }

    /// Returns whether the availability key changed. Closes a dismiss-on-pick
    /// picker.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        let changed = date != self.date;

        debug!("Selecting date {} (changed: {})", date, changed);
        self.date = date;
        self.hour = None;
        self.close_picker_after_pick();

        changed
    }

    /// Handles a picker interaction that may or may not carry a date; `None`
    /// means the user dismissed it.
    pub fn pick_date(&mut self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(date) => self.select_date(date),
            None => {
                self.close_picker_after_pick();
                false
            }
        }
    }

    pub fn toggle_date_picker(&mut self) {
        self.date_picker_open = !self.date_picker_open;
    }

    /// Availability is not checked here; submission validates it.
    pub fn select_hour(&mut self, hour: i32) {
        debug!("Selecting hour {}", hour);
        self.hour = Some(hour);
    }

    fn close_picker_after_pick(&mut self) {
        if self.picker_behavior == DatePickerBehavior::DismissOnPick {
            self.date_picker_open = false;
        }
    }
}
