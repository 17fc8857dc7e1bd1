//! Client configuration
//!
//! Display settings come from the backend (`GET /api/v2/config`); when the
//! request fails the client keeps working with defaults.

use contracts::shared::display_config::DisplayConfig;

use super::api_utils::{api_base, api_url, fetch_json};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub display: DisplayConfig,
}

impl AppConfig {
    pub fn from_location() -> Self {
        Self {
            api_base: api_base(),
            display: DisplayConfig::default(),
        }
    }

    pub async fn load() -> Self {
        let mut config = Self::from_location();
        let url = api_url(&config.api_base, "/api/v2/config");
        match fetch_json::<DisplayConfig>(&url).await {
            Ok(display) => {
                log::info!(
                    "display config loaded: timezone={:?}, default topic type={:?}",
                    display.display_timezone,
                    display.default_topic_type
                );
                config.display = display;
            }
            Err(e) => log::warn!("display config unavailable, using defaults: {}", e),
        }
        config
    }

    pub fn display_timezone(&self) -> Option<&str> {
        self.display
            .display_timezone
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn default_topic_type(&self) -> Option<&str> {
        self.display
            .default_topic_type
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}
