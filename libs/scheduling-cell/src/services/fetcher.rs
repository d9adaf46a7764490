use tracing::{debug, warn};

use shared_models::AppError;

use crate::api::SchedulingApi;
use crate::models::{AvailabilityKey, AvailabilitySlot, AvailabilityTable};

/// What the booking screen currently knows about the day's availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityState {
    /// No fetch has been started.
    Idle,
    /// A fetch for this key is in flight; the previous table is already gone.
    Loading(AvailabilityKey),
    Loaded(AvailabilityTable),
    /// The last fetch for this key failed. Nothing is bookable until the key
    /// changes or availability is refreshed.
    Failed(AvailabilityKey),
}

/// Tags a fetch with the key it was issued for and its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a fetch ticket does nothing until its fetch is run and applied"]
pub struct FetchTicket {
    generation: u64,
    key: AvailabilityKey,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &AvailabilityKey {
        &self.key
    }
}

/// A completed fetch, still carrying its ticket.
#[derive(Debug)]
pub struct FetchResult {
    pub ticket: FetchTicket,
    pub result: Result<Vec<AvailabilitySlot>, AppError>,
}

/// Keeps the current availability table in step with the selected key.
///
/// Every fetch bumps the generation counter. A result is applied only when
/// its generation is still the newest and its key still matches the
/// selection; anything else is dropped. In-flight fetches are never aborted.
#[derive(Debug)]
pub struct AvailabilityFetcher {
    generation: u64,
    state: AvailabilityState,
}

impl Default for AvailabilityFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityFetcher {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: AvailabilityState::Idle,
        }
    }

    pub fn state(&self) -> &AvailabilityState {
        &self.state
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// The loaded table, if it belongs to `key`.
    pub fn table_for(&self, key: &AvailabilityKey) -> Option<&AvailabilityTable> {
        match &self.state {
            AvailabilityState::Loaded(table) if table.key() == key => Some(table),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AvailabilityState::Loading(_))
    }

    /// Starts a new generation for `key` and discards the previous table.
    pub fn begin(&mut self, key: AvailabilityKey) -> FetchTicket {
        self.generation += 1;
        debug!("Starting availability fetch #{} for {}", self.generation, key);

        self.state = AvailabilityState::Loading(key.clone());
        FetchTicket {
            generation: self.generation,
            key,
        }
    }

    /// Runs the remote call for a ticket. Borrows nothing from the fetcher, so
    /// several fetches may be in flight at once.
    pub async fn fetch(api: &dyn SchedulingApi, ticket: FetchTicket) -> FetchResult {
        let result = api
            .fetch_day_availability(&ticket.key.provider_id, ticket.key.date)
            .await;

        FetchResult { ticket, result }
    }

    pub fn is_current(&self, ticket: &FetchTicket, current_key: &AvailabilityKey) -> bool {
        ticket.generation == self.generation && &ticket.key == current_key
    }

    /// Applies a completed fetch if it is still current. Returns `false` when
    /// the result was stale and dropped.
    pub fn apply(&mut self, completed: FetchResult, current_key: &AvailabilityKey) -> bool {
        let FetchResult { ticket, result } = completed;

        if !self.is_current(&ticket, current_key) {
            debug!(
                "Dropping stale availability fetch #{} for {} (current #{})",
                ticket.generation, ticket.key, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(slots) => {
                debug!("Loaded {} availability slots for {}", slots.len(), ticket.key);
                AvailabilityState::Loaded(AvailabilityTable::new(ticket.key, slots))
            }
            Err(e) => {
                warn!("Failed to fetch availability for {}: {}", ticket.key, e);
                AvailabilityState::Failed(ticket.key)
            }
        };

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(provider: &str, day: u32) -> AvailabilityKey {
        AvailabilityKey::new(provider, NaiveDate::from_ymd_opt(2024, 3, day).unwrap())
    }

    fn ok(ticket: FetchTicket, hours: &[i32]) -> FetchResult {
        FetchResult {
            ticket,
            result: Ok(hours.iter().map(|&h| AvailabilitySlot::new(h, true)).collect()),
        }
    }

    #[test]
    fn test_begin_bumps_generation_and_discards_table() {
        let mut fetcher = AvailabilityFetcher::new();
        let a = key("p-1", 15);

        let ticket = fetcher.begin(a.clone());
        assert_eq!(ticket.generation(), 1);
        assert!(fetcher.apply(ok(ticket, &[9]), &a));
        assert!(fetcher.table_for(&a).is_some());

        let second = fetcher.begin(a.clone());
        assert_eq!(second.generation(), 2);
        assert_eq!(fetcher.state(), &AvailabilityState::Loading(a.clone()));
        assert!(fetcher.table_for(&a).is_none());
    }

    #[test]
    fn test_older_result_resolving_last_is_dropped() {
        let mut fetcher = AvailabilityFetcher::new();
        let a = key("p-1", 15);
        let b = key("p-2", 15);

        let ticket_a = fetcher.begin(a);
        let ticket_b = fetcher.begin(b.clone());

        assert!(fetcher.apply(ok(ticket_b, &[14]), &b));
        assert!(!fetcher.apply(ok(ticket_a, &[9]), &b));

        let table = fetcher.table_for(&b).expect("b should be loaded");
        assert_eq!(table.slots(), &[AvailabilitySlot::new(14, true)]);
    }

    #[test]
    fn test_same_key_refetch_drops_older_generation() {
        let mut fetcher = AvailabilityFetcher::new();
        let a = key("p-1", 15);

        let first = fetcher.begin(a.clone());
        let second = fetcher.begin(a.clone());

        assert!(!fetcher.apply(ok(first, &[9]), &a));
        assert!(fetcher.is_loading());
        assert!(fetcher.apply(ok(second, &[10]), &a));
    }

    #[test]
    fn test_result_for_key_no_longer_selected_is_dropped() {
        let mut fetcher = AvailabilityFetcher::new();
        let a = key("p-1", 15);

        let ticket = fetcher.begin(a);
        assert!(!fetcher.apply(ok(ticket, &[9]), &key("p-1", 16)));
    }

    #[test]
    fn test_failure_marks_key_failed() {
        let mut fetcher = AvailabilityFetcher::new();
        let a = key("p-1", 15);

        let ticket = fetcher.begin(a.clone());
        let applied = fetcher.apply(
            FetchResult {
                ticket,
                result: Err(AppError::Network("connection reset".into())),
            },
            &a,
        );

        assert!(applied);
        assert_eq!(fetcher.state(), &AvailabilityState::Failed(a.clone()));
        assert!(fetcher.table_for(&a).is_none());
    }
}
