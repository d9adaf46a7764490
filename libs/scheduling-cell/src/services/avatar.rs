use shared_config::AppConfig;

use crate::models::Provider;

/// Picks the avatar to show for a person, generating one from their name when
/// the server has none.
#[derive(Debug, Clone)]
pub struct AvatarResolver {
    fallback_base_url: String,
}

impl AvatarResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            fallback_base_url: config.avatar_fallback_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, avatar_url: Option<&str>, name: &str) -> String {
        match avatar_url.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.fallback_for(name),
        }
    }

    pub fn fallback_for(&self, name: &str) -> String {
        format!("{}/{}", self.fallback_base_url, urlencoding::encode(name))
    }

    /// Fills in a fallback avatar for every provider, keeping their order.
    pub fn apply_to_providers(&self, providers: Vec<Provider>) -> Vec<Provider> {
        providers
            .into_iter()
            .map(|mut provider| {
                let resolved = self.resolve(provider.avatar_url.as_deref(), &provider.display_name);
                provider.avatar_url = Some(resolved);
                provider
            })
            .collect()
    }
}
