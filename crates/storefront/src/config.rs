//! Storefront browsing configuration.
//!
//! Loaded from an optional JSON file (`STOREFRONT_CONFIG`) and then
//! overridden by individual environment variables. Bad values fall back to
//! defaults with a warning rather than aborting startup.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use storefront_catalog::ProductSearchCriteria;
use storefront_core::{StorefrontError, StorefrontResult};
use storefront_observability::LogFormat;
use storefront_orders::DEFAULT_PURCHASE_HISTORY_WINDOW;

pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";
pub const DEFAULT_PAGE_SIZE_ENV: &str = "STOREFRONT_DEFAULT_PAGE_SIZE";
pub const PURCHASE_HISTORY_WINDOW_ENV: &str = "STOREFRONT_PURCHASE_HISTORY_WINDOW";
pub const LOG_FORMAT_ENV: &str = storefront_observability::tracing::LOG_FORMAT_ENV;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorefrontConfig {
    /// Page size used by lazy product collections when none is requested.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Number of most recent orders read for "purchased only" browsing.
    /// May lower the default of 5, never raise it.
    #[serde(default = "default_purchase_history_window")]
    pub purchase_history_window: usize,
    /// Mirrors `STOREFRONT_LOG_FORMAT`, which `storefront_observability::init`
    /// reads directly when installing the subscriber.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_page_size() -> u32 {
    ProductSearchCriteria::DEFAULT_PAGE_SIZE
}

fn default_purchase_history_window() -> usize {
    DEFAULT_PURCHASE_HISTORY_WINDOW
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            purchase_history_window: default_purchase_history_window(),
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// File (if `STOREFRONT_CONFIG` is set) plus environment overrides.
    pub fn load() -> StorefrontResult<Self> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_json_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.with_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> StorefrontResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| StorefrontError::configuration(format!("invalid config JSON: {e}")))
    }

    pub fn from_json_file(path: &Path) -> StorefrontResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StorefrontError::configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Apply overrides from `lookup` (the process environment in production).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(size) = parse_override(&lookup, DEFAULT_PAGE_SIZE_ENV) {
            self.default_page_size = size;
        }
        if let Some(window) = parse_override(&lookup, PURCHASE_HISTORY_WINDOW_ENV) {
            self.purchase_history_window = window;
        }
        if let Some(raw) = lookup(LOG_FORMAT_ENV) {
            match LogFormat::parse(&raw) {
                Some(format) => self.log_format = format,
                None => tracing::warn!(
                    key = LOG_FORMAT_ENV,
                    value = %raw,
                    "unknown log format; keeping {:?}",
                    self.log_format
                ),
            }
        }
        self
    }

    pub fn validate(&self) -> StorefrontResult<()> {
        if self.default_page_size == 0 {
            return Err(StorefrontError::configuration(
                "default_page_size must be at least 1",
            ));
        }
        if !(1..=DEFAULT_PURCHASE_HISTORY_WINDOW).contains(&self.purchase_history_window) {
            return Err(StorefrontError::configuration(format!(
                "purchase_history_window must be between 1 and {DEFAULT_PURCHASE_HISTORY_WINDOW}"
            )));
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable config override");
            None
        }
    }
}
