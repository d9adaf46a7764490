use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_AVATAR_FALLBACK_BASE_URL: &str = "https://api.adorable.io/avatars/285";
pub const DEFAULT_USER_ID: &str = "anonymous";
pub const DEFAULT_USER_NAME: &str = "Guest";

/// How the date picker reacts once the user picks (or dismisses) a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePickerBehavior {
    /// Modal picker that closes itself on every interaction.
    #[default]
    DismissOnPick,
    /// Inline picker that stays open until toggled.
    Inline,
}

impl FromStr for DatePickerBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dismiss_on_pick" | "modal" | "android" => Ok(DatePickerBehavior::DismissOnPick),
            "inline" | "ios" => Ok(DatePickerBehavior::Inline),
            other => Err(format!("unknown date picker mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_timeout: Option<Duration>,
    pub avatar_fallback_base_url: String,
    pub date_picker_behavior: DatePickerBehavior,
    pub api_token: Option<String>,
    pub user_id: String,
    pub user_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: None,
            avatar_fallback_base_url: DEFAULT_AVATAR_FALLBACK_BASE_URL.to_string(),
            date_picker_behavior: DatePickerBehavior::default(),
            api_token: None,
            user_id: DEFAULT_USER_ID.to_string(),
            user_name: DEFAULT_USER_NAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("API_BASE_URL not set, using default");
                    DEFAULT_API_BASE_URL.to_string()
                }),
            api_timeout: match env::var("API_TIMEOUT_SECS") {
                Ok(raw) => match raw.parse::<u64>() {
                    Ok(secs) => Some(Duration::from_secs(secs)),
                    Err(_) => {
                        warn!("API_TIMEOUT_SECS is not a number ({}), ignoring", raw);
                        None
                    }
                },
                Err(_) => None,
            },
            avatar_fallback_base_url: env::var("AVATAR_FALLBACK_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("AVATAR_FALLBACK_BASE_URL not set, using default");
                    DEFAULT_AVATAR_FALLBACK_BASE_URL.to_string()
                }),
            date_picker_behavior: match env::var("DATE_PICKER_MODE") {
                Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                    warn!("{}, falling back to dismiss_on_pick", e);
                    DatePickerBehavior::DismissOnPick
                }),
                Err(_) => DatePickerBehavior::default(),
            },
            api_token: match env::var("API_TOKEN") {
                Ok(token) if !token.trim().is_empty() => Some(token),
                _ => {
                    warn!("API_TOKEN not set, requests will be unauthenticated");
                    None
                }
            },
            user_id: env::var("BOOKING_USER_ID")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_USER_ID not set, using default");
                    DEFAULT_USER_ID.to_string()
                }),
            user_name: env::var("BOOKING_USER_NAME")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_USER_NAME not set, using default");
                    DEFAULT_USER_NAME.to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - API_BASE_URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let url = self.api_base_url.trim();
        !url.is_empty() && (url.starts_with("http://") || url.starts_with("https://"))
    }
}
