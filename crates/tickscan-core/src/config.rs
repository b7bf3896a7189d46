//! Environment-first scanner configuration.
//!
//! Every tunable has a default; the environment only overrides. A missing
//! provider key is not an error — it selects demo mode so the scanner stays
//! exercisable without credentials.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{DemoProvider, FmpProvider, PolygonProvider};
use crate::provider::QuoteProvider;

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 200;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 4_000;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 30;

pub const ENV_POLYGON_API_KEY: &str = "TICKSCAN_POLYGON_API_KEY";
pub const ENV_FMP_API_KEY: &str = "TICKSCAN_FMP_API_KEY";
pub const ENV_BATCH_SIZE: &str = "TICKSCAN_BATCH_SIZE";
pub const ENV_INTER_BATCH_DELAY_MS: &str = "TICKSCAN_INTER_BATCH_DELAY_MS";
pub const ENV_FETCH_TIMEOUT_MS: &str = "TICKSCAN_FETCH_TIMEOUT_MS";
pub const ENV_CACHE_TTL_SECONDS: &str = "TICKSCAN_CACHE_TTL_SECONDS";
pub const ENV_UNIVERSE_PATH: &str = "TICKSCAN_UNIVERSE_PATH";

/// Runtime configuration for the scanning pipeline.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub polygon_api_key: Option<String>,
    pub fmp_api_key: Option<String>,
    pub batch_size: usize,
    pub inter_batch_delay: Duration,
    pub fetch_timeout: Duration,
    pub cache_ttl_seconds: u64,
    pub universe_path: Option<PathBuf>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            polygon_api_key: None,
            fmp_api_key: None,
            batch_size: DEFAULT_BATCH_SIZE,
            inter_batch_delay: Duration::from_millis(DEFAULT_INTER_BATCH_DELAY_MS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            universe_path: None,
        }
    }
}

impl ScannerConfig {
    /// Read configuration from the process environment, keeping defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            polygon_api_key: non_empty_env(ENV_POLYGON_API_KEY),
            fmp_api_key: non_empty_env(ENV_FMP_API_KEY),
            batch_size: parsed_env(ENV_BATCH_SIZE)
                .filter(|size| *size > 0)
                .unwrap_or(defaults.batch_size),
            inter_batch_delay: parsed_env(ENV_INTER_BATCH_DELAY_MS)
                .map(Duration::from_millis)
                .unwrap_or(defaults.inter_batch_delay),
            fetch_timeout: parsed_env(ENV_FETCH_TIMEOUT_MS)
                .filter(|ms: &u64| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.fetch_timeout),
            cache_ttl_seconds: parsed_env(ENV_CACHE_TTL_SECONDS)
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.cache_ttl_seconds),
            universe_path: non_empty_env(ENV_UNIVERSE_PATH).map(PathBuf::from),
        }
    }

    /// Whether any real provider credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.fmp_api_key.is_some() || self.polygon_api_key.is_some()
    }

    /// Select the quote provider for this configuration. FMP wins when both
    /// keys are present (single round-trip per symbol with change figures
    /// included); no key at all selects the demo generator.
    pub fn build_provider(&self) -> Arc<dyn QuoteProvider> {
        if let Some(key) = &self.fmp_api_key {
            Arc::new(
                FmpProvider::new(key.clone()).with_timeout_ms(self.fetch_timeout.as_millis() as u64),
            )
        } else if let Some(key) = &self.polygon_api_key {
            Arc::new(
                PolygonProvider::new(key.clone())
                    .with_timeout_ms(self.fetch_timeout.as_millis() as u64),
            )
        } else {
            Arc::new(DemoProvider::new(self.cache_ttl_seconds))
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parsed_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn default_config_selects_demo_provider() {
        let config = ScannerConfig::default();
        assert!(!config.has_credentials());
        assert_eq!(config.build_provider().id(), ProviderId::Demo);
    }

    #[test]
    fn fmp_key_wins_over_polygon() {
        let config = ScannerConfig {
            polygon_api_key: Some(String::from("poly")),
            fmp_api_key: Some(String::from("fmp")),
            ..ScannerConfig::default()
        };
        assert_eq!(config.build_provider().id(), ProviderId::Fmp);
    }

    #[test]
    fn polygon_key_alone_selects_polygon() {
        let config = ScannerConfig {
            polygon_api_key: Some(String::from("poly")),
            ..ScannerConfig::default()
        };
        assert_eq!(config.build_provider().id(), ProviderId::Polygon);
    }
}
