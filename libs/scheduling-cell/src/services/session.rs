use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_models::User;

use crate::api::SchedulingApi;
use crate::error::SchedulingError;
use crate::models::{BookingOutcome, DaySchedule, Provider};
use crate::services::avatar::AvatarResolver;
use crate::services::fetcher::{AvailabilityFetcher, AvailabilityState, FetchResult, FetchTicket};
use crate::services::partition::partition;
use crate::services::selection::SelectionState;
use crate::services::submitter::BookingSubmitter;

/// One booking screen: the provider list, the user's selection, the current
/// availability table and the submitter. Dropped when the screen closes.
pub struct BookingSession {
    user: User,
    api: Arc<dyn SchedulingApi>,
    avatars: AvatarResolver,
    providers: Vec<Provider>,
    selection: SelectionState,
    fetcher: AvailabilityFetcher,
    submitter: BookingSubmitter,
}

impl BookingSession {
    /// `provider_id` is the navigation input; `date` is usually today.
    pub fn new(
        user: User,
        api: Arc<dyn SchedulingApi>,
        config: &AppConfig,
        provider_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let selection = SelectionState::new(provider_id, date, config.date_picker_behavior);
        info!(
            "Opening booking session for user {} with provider {}",
            user.id,
            selection.provider_id()
        );

        Self {
            user,
            submitter: BookingSubmitter::new(api.clone()),
            api,
            avatars: AvatarResolver::new(config),
            providers: Vec::new(),
            selection,
            fetcher: AvailabilityFetcher::new(),
        }
    }

    /// Loads the provider list and the availability for the initial key.
    pub async fn open(&mut self) -> Result<(), SchedulingError> {
        let ticket = self.begin_fetch();
        let (providers, fetched) = tokio::join!(
            self.api.list_providers(),
            AvailabilityFetcher::fetch(self.api.as_ref(), ticket)
        );

        self.apply_availability(fetched);
        self.providers = self.avatars.apply_to_providers(providers?);
        Ok(())
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn header_avatar_url(&self) -> String {
        self.avatars.resolve(self.user.avatar_url.as_deref(), &self.user.name)
    }

    // --------------------------------------------------------------------------
    // Providers
    // --------------------------------------------------------------------------

    pub async fn load_providers(&mut self) -> Result<&[Provider], SchedulingError> {
        let providers = self.api.list_providers().await?;
        debug!("Loaded {} providers", providers.len());

        self.providers = self.avatars.apply_to_providers(providers);
        Ok(&self.providers)
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn is_selected(&self, provider_id: &str) -> bool {
        self.selection.provider_id() == provider_id
    }

    // --------------------------------------------------------------------------
    // Selection
    // --------------------------------------------------------------------------

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Returns a ticket when the availability key changed and must be
    /// refetched.
    pub fn select_provider(&mut self, provider_id: impl Into<String>) -> Option<FetchTicket> {
        if self.selection.select_provider(provider_id) {
            Some(self.begin_fetch())
        } else {
            None
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Option<FetchTicket> {
        if self.selection.select_date(date) {
            Some(self.begin_fetch())
        } else {
            None
        }
    }

    pub fn pick_date(&mut self, date: Option<NaiveDate>) -> Option<FetchTicket> {
        if self.selection.pick_date(date) {
            Some(self.begin_fetch())
        } else {
            None
        }
    }

    pub fn toggle_date_picker(&mut self) {
        self.selection.toggle_date_picker();
    }

    pub fn select_hour(&mut self, hour: i32) {
        self.selection.select_hour(hour);
    }

    // --------------------------------------------------------------------------
    // Availability
    // --------------------------------------------------------------------------

    pub fn availability(&self) -> &AvailabilityState {
        self.fetcher.state()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetcher.begin(self.selection.key())
    }

    /// The remote call for `ticket`, detached from the session so the caller
    /// can keep interacting while it runs.
    pub fn fetch_task(
        &self,
        ticket: FetchTicket,
    ) -> impl Future<Output = FetchResult> + Send + 'static {
        let api = self.api.clone();
        async move { AvailabilityFetcher::fetch(api.as_ref(), ticket).await }
    }

    /// Returns `false` if the result was stale and dropped.
    pub fn apply_availability(&mut self, completed: FetchResult) -> bool {
        let current = self.selection.key();
        self.fetcher.apply(completed, &current)
    }

    /// Fetches availability for the current key and applies it.
    pub async fn refresh_availability(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let completed = self.fetch_task(ticket).await;
        self.apply_availability(completed)
    }

    pub async fn change_provider(&mut self, provider_id: impl Into<String>) -> bool {
        match self.select_provider(provider_id) {
            Some(ticket) => {
                let completed = self.fetch_task(ticket).await;
                self.apply_availability(completed)
            }
            None => false,
        }
    }

    pub async fn change_date(&mut self, date: Option<NaiveDate>) -> bool {
        match self.pick_date(date) {
            Some(ticket) => {
                let completed = self.fetch_task(ticket).await;
                self.apply_availability(completed)
            }
            None => false,
        }
    }

    /// Morning and afternoon slots for the current key, with the selected
    /// hour flagged. Empty while loading or after a failed fetch.
    pub fn schedule(&self) -> DaySchedule {
        match self.fetcher.table_for(&self.selection.key()) {
            Some(table) => partition(table).with_selected(self.selection.hour()),
            None => DaySchedule::default(),
        }
    }

    // --------------------------------------------------------------------------
    // Submission
    // --------------------------------------------------------------------------

    pub fn can_submit(&self) -> bool {
        !self.submitter.is_in_flight()
            && BookingSubmitter::build_request(&self.selection, self.fetcher.state()).is_ok()
    }

    pub async fn submit(&self) -> Result<BookingOutcome, SchedulingError> {
        self.submitter.submit(&self.selection, self.fetcher.state()).await
    }
}
