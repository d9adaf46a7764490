use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_models::{SignOut, User};

use crate::api::SchedulingApi;
use crate::error::SchedulingError;
use crate::models::Provider;
use crate::services::avatar::AvatarResolver;
use crate::services::session::BookingSession;

/// Landing screen: greets the user, lists providers and opens a booking
/// session for the one the user taps.
pub struct Dashboard {
    user: User,
    api: Arc<dyn SchedulingApi>,
    config: AppConfig,
    avatars: AvatarResolver,
    sign_out: Arc<dyn SignOut>,
    providers: Vec<Provider>,
}

impl Dashboard {
    pub fn new(
        user: User,
        api: Arc<dyn SchedulingApi>,
        config: &AppConfig,
        sign_out: Arc<dyn SignOut>,
    ) -> Self {
        Self {
            user,
            api,
            config: config.clone(),
            avatars: AvatarResolver::new(config),
            sign_out,
            providers: Vec::new(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn greeting(&self) -> String {
        format!("Welcome,\n{}", self.user.name)
    }

    pub fn user_avatar_url(&self) -> String {
        self.avatars.resolve(self.user.avatar_url.as_deref(), &self.user.name)
    }

    pub async fn load_providers(&mut self) -> Result<&[Provider], SchedulingError> {
        let providers = self.api.list_providers().await?;
        debug!("Dashboard loaded {} providers", providers.len());

        self.providers = self.avatars.apply_to_providers(providers);
        Ok(&self.providers)
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Navigation into the booking screen for `provider_id`, starting on `date`.
    pub fn open_booking(&self, provider_id: impl Into<String>, date: NaiveDate) -> BookingSession {
        BookingSession::new(
            self.user.clone(),
            self.api.clone(),
            &self.config,
            provider_id,
            date,
        )
    }

    pub fn sign_out(&self) {
        info!("User {} signing out", self.user.id);
        self.sign_out.sign_out();
    }
}
