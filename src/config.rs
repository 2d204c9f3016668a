use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{
    AUTOPLAY_DELAY_MS, CONTENT_FADE_MS, MAX_CHAINED_SKIPS, SCROLL_DEBOUNCE_MS,
    SENTINEL_ROOT_MARGIN_PX, SENTINEL_THRESHOLD, SLIDE_DURATION_MS, STALENESS_HORIZON_SECS,
    TMDB_BASE_URL, TMDB_IMAGE_BASE_URL, TMDB_LANGUAGE,
};
use crate::core::carousel::CarouselTiming;
use crate::core::list_view::ListViewOptions;
use crate::core::pagination::PaginatorOptions;
use crate::core::visibility::VisibilityOptions;

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub carousel: CarouselConfig,

    #[serde(default)]
    pub visibility: VisibilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_max_chained_skips")]
    pub max_chained_skips: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// How long saved list state and scroll offsets stay valid
    #[serde(default = "default_horizon")]
    pub horizon_secs: i64,

    #[serde(default = "default_scroll_debounce")]
    pub scroll_debounce_ms: u64,

    /// Where page state is written; defaults to the platform cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_autoplay")]
    pub autoplay_ms: u64,

    #[serde(default = "default_content_fade")]
    pub content_fade_ms: u64,

    #[serde(default = "default_slide")]
    pub slide_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityConfig {
    #[serde(default = "default_root_margin")]
    pub root_margin_px: f64,

    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Config {
    /// Sensor and scroll settings for list pages.
    pub fn list_view_options(&self) -> ListViewOptions {
        ListViewOptions {
            visibility: self.visibility.options(),
            scroll_debounce: self.persistence.scroll_debounce(),
            ..ListViewOptions::default()
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
            info!("Config loaded successfully");
            config
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(config_path)?;
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", config_path);
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                debug!("Using API key from {}", API_KEY_ENV);
                self.api.api_key = Some(key);
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("cinebrowse").join("config.toml"))
    }
}

impl PaginationConfig {
    pub fn options(&self) -> PaginatorOptions {
        PaginatorOptions {
            max_chained_skips: self.max_chained_skips,
        }
    }
}

impl PersistenceConfig {
    pub fn horizon(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.horizon_secs)
    }

    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir().context("Failed to get cache directory")?;
        Ok(cache_dir.join("cinebrowse").join("state"))
    }
}

impl CarouselConfig {
    pub fn timing(&self) -> CarouselTiming {
        CarouselTiming {
            autoplay: Duration::from_millis(self.autoplay_ms),
            content_fade: Duration::from_millis(self.content_fade_ms),
            slide: Duration::from_millis(self.slide_ms),
        }
    }
}

impl VisibilityConfig {
    pub fn options(&self) -> VisibilityOptions {
        VisibilityOptions {
            root_margin: self.root_margin_px,
            threshold: self.threshold,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_chained_skips: default_max_chained_skips(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            horizon_secs: default_horizon(),
            scroll_debounce_ms: default_scroll_debounce(),
            storage_dir: None,
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay_ms: default_autoplay(),
            content_fade_ms: default_content_fade(),
            slide_ms: default_slide(),
            featured_limit: None,
        }
    }
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            root_margin_px: default_root_margin(),
            threshold: default_threshold(),
        }
    }
}

// Default value functions
fn default_base_url() -> String { TMDB_BASE_URL.to_string() }
fn default_image_base_url() -> String { TMDB_IMAGE_BASE_URL.to_string() }
fn default_language() -> String { TMDB_LANGUAGE.to_string() }
fn default_timeout() -> u64 { 30 }
fn default_max_chained_skips() -> u32 { MAX_CHAINED_SKIPS }
fn default_horizon() -> i64 { STALENESS_HORIZON_SECS }
fn default_scroll_debounce() -> u64 { SCROLL_DEBOUNCE_MS }
fn default_autoplay() -> u64 { AUTOPLAY_DELAY_MS }
fn default_content_fade() -> u64 { CONTENT_FADE_MS }
fn default_slide() -> u64 { SLIDE_DURATION_MS }
fn default_root_margin() -> f64 { SENTINEL_ROOT_MARGIN_PX }
fn default_threshold() -> f64 { SENTINEL_THRESHOLD }
