//! Configuration settings for coinpulse.

use crate::error::{Error, Result};
use crate::events::Keymap;
use crate::market::Sentiment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Largest page size the markets endpoint accepts.
const MAX_PAGE_SIZE: u32 = 250;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Market data API configuration.
    pub api: ApiConfig,
    /// Poll schedules and page sizes.
    pub polling: PollingConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    ///
    /// On first run the defaults are written out as an editable template.
    pub fn load_or_default() -> Result<Self> {
        let path = default_path();
        let seed = !path.exists();
        let config = Self::load(Some(path.clone()))?;
        if seed && let Err(e) = config.save(Some(path.clone())) {
            warn!(error = %e, path = %path.display(), "could not write default config");
        }
        Ok(config)
    }

    /// Load configuration from file.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse or validate is an error.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_path);

        let config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = path.unwrap_or_else(default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Check invariants the pollers rely on.
    pub fn validate(&self) -> Result<()> {
        let polling = &self.polling;

        if polling.price_interval_secs == 0 || polling.news_interval_secs == 0 {
            return Err(Error::config("poll intervals must be greater than zero"));
        }
        if polling.fetch_timeout_secs == 0 {
            return Err(Error::config("fetch timeout must be greater than zero"));
        }
        if polling.fetch_timeout_secs > polling.price_interval_secs
            || polling.fetch_timeout_secs > polling.news_interval_secs
        {
            return Err(Error::config(format!(
                "fetch timeout ({}s) must not exceed either poll interval",
                polling.fetch_timeout_secs
            )));
        }
        for (name, limit) in [
            ("price_limit", polling.price_limit),
            ("news_limit", polling.news_limit),
        ] {
            if !(1..=MAX_PAGE_SIZE).contains(&limit) {
                return Err(Error::config(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_PAGE_SIZE, limit
                )));
            }
        }
        if self.api.vs_currency.trim().is_empty() {
            return Err(Error::config("vs_currency must not be empty"));
        }
        Keymap::try_from(&self.keybindings)?;

        Ok(())
    }
}

fn default_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Market data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST API base URL.
    pub base_url: String,
    /// Base URL for per-coin detail pages.
    pub detail_base_url: String,
    /// Quote currency for prices.
    pub vs_currency: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            detail_base_url: "https://www.coingecko.com/en/coins".to_string(),
            vs_currency: "usd".to_string(),
            user_agent: concat!("coinpulse/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Poll schedules and page sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between price card refreshes.
    pub price_interval_secs: u64,
    /// Seconds between market update refreshes.
    pub news_interval_secs: u64,
    /// Number of top-ranked coins shown as price cards.
    pub price_limit: u32,
    /// Number of top-ranked coins turned into market updates.
    pub news_limit: u32,
    /// Deadline for a single fetch.
    pub fetch_timeout_secs: u64,
}

impl PollingConfig {
    /// Price poll period.
    pub fn price_interval(&self) -> Duration {
        Duration::from_secs(self.price_interval_secs)
    }

    /// News poll period.
    pub fn news_interval(&self) -> Duration {
        Duration::from_secs(self.news_interval_secs)
    }

    /// Deadline applied to each fetch.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            price_interval_secs: 60,
            news_interval_secs: 120,
            price_limit: 10,
            news_limit: 100,
            fetch_timeout_secs: 30,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw interval in milliseconds.
    pub tick_rate_ms: u64,
    /// Sentiment selected when the dashboard opens.
    pub default_filter: Sentiment,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            default_filter: Sentiment::Hot,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Move focus between the price and update panes.
    pub focus: String,
    /// Refresh both feeds now.
    pub refresh: String,
    /// Show hot updates.
    pub filter_hot: String,
    /// Show medium updates.
    pub filter_medium: String,
    /// Show cold updates.
    pub filter_cold: String,
    /// Select the next filter.
    pub next_filter: String,
    /// Select the previous filter.
    pub prev_filter: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            focus: "Tab".to_string(),
            refresh: "r".to_string(),
            filter_hot: "1".to_string(),
            filter_medium: "2".to_string(),
            filter_cold: "3".to_string(),
            next_filter: "l".to_string(),
            prev_filter: "h".to_string(),
        }
    }
}
