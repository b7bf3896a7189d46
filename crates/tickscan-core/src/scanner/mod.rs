//! The scanning pipeline: request validation, batched fetching, filtering,
//! scoring, and ranking.
//!
//! One [`Scanner::scan`] pass runs:
//!
//! ```text
//! validate -> sample universe -> batch fetch (cache-backed)
//!          -> bound filters -> scan-type predicate -> score
//!          -> rank desc -> truncate to limit
//! ```
//!
//! A scan always resolves to a well-formed [`ScanOutcome`]; individual
//! symbol failures are dropped from the result set, never raised.

mod batch;
mod filter;
mod score;

pub use batch::{chunk_count, BatchFetcher};
pub use filter::{passes_bounds, ScanType, SECTOR_ALL};
pub use score::{pattern_label, rank, rsi_proxy, ScoreBreakdown, ScoredQuote, MAX_SCORE};

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cache::{MemoryQuoteCache, QuoteCache};
use crate::config::ScannerConfig;
use crate::provider::{FetchOutcome, QuoteProvider};
use crate::universe::SymbolUniverse;
use crate::{Symbol, UtcDateTime, ValidationError};

pub const DEFAULT_MIN_PRICE: f64 = 10.0;
pub const DEFAULT_MAX_PRICE: f64 = 1_000.0;
pub const DEFAULT_MIN_VOLUME: u64 = 1_000_000;
pub const DEFAULT_LIMIT: usize = 25;
pub const DEFAULT_UNIVERSE_SIZE: usize = 50;

/// Symbols used for the market summary overview.
const BELLWETHERS: [&str; 4] = ["AAPL", "TSLA", "GOOGL", "NVDA"];

/// Parameters of one scan invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub scan_type: ScanType,
    pub min_price: f64,
    pub max_price: f64,
    pub min_volume: u64,
    pub sector: String,
    pub limit: usize,
    pub universe_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}

impl ScanRequest {
    pub fn new(scan_type: ScanType) -> Self {
        Self {
            scan_type,
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            min_volume: DEFAULT_MIN_VOLUME,
            sector: String::from(SECTOR_ALL),
            limit: DEFAULT_LIMIT,
            universe_size: DEFAULT_UNIVERSE_SIZE,
            min_score: None,
        }
    }

    pub fn with_price_range(mut self, min_price: f64, max_price: f64) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_min_volume(mut self, min_volume: u64) -> Self {
        self.min_volume = min_volume;
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = sector.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_universe_size(mut self, universe_size: usize) -> Self {
        self.universe_size = universe_size;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Boundary validation. Runs before any network activity so contract
    /// violations fail fast and cheaply.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == 0 {
            return Err(ValidationError::ZeroLimit);
        }
        if self.universe_size == 0 {
            return Err(ValidationError::ZeroUniverseSize);
        }
        if !self.min_price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "min_price" });
        }
        if !self.max_price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "max_price" });
        }
        if self.min_price < 0.0 {
            return Err(ValidationError::NegativeValue { field: "min_price" });
        }
        if self.min_price > self.max_price {
            return Err(ValidationError::InvertedPriceRange {
                min_price: self.min_price,
                max_price: self.max_price,
            });
        }
        if let Some(min_score) = self.min_score {
            if !min_score.is_finite() || !(0.0..=MAX_SCORE).contains(&min_score) {
                return Err(ValidationError::ScoreOutOfRange { value: min_score });
            }
        }
        Ok(())
    }
}

/// Echo of the filters a scan ran with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFilters {
    pub min_price: f64,
    pub max_price: f64,
    pub min_volume: u64,
    pub sector: String,
}

impl ScanFilters {
    fn from_request(request: &ScanRequest) -> Self {
        Self {
            min_price: request.min_price,
            max_price: request.max_price,
            min_volume: request.min_volume,
            sector: request.sector.clone(),
        }
    }
}

/// Result envelope of one scan pass. Always well-formed: failures set
/// `success: false` and carry the reason in `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub success: bool,
    pub scan_type: ScanType,
    pub stocks: Vec<ScoredQuote>,
    pub total_scanned: usize,
    pub matches: usize,
    pub processing_time_seconds: f64,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub filters: ScanFilters,
}

impl ScanOutcome {
    fn rejected(request: &ScanRequest, error: ValidationError, started: Instant) -> Self {
        Self {
            success: false,
            scan_type: request.scan_type,
            stocks: Vec::new(),
            total_scanned: 0,
            matches: 0,
            processing_time_seconds: started.elapsed().as_secs_f64(),
            error: Some(error.to_string()),
            warnings: Vec::new(),
            filters: ScanFilters::from_request(request),
        }
    }
}

/// One line of the market summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub symbol: Symbol,
    pub price: f64,
    pub change_percent: f64,
    pub volume: u64,
}

/// Quick gainers/losers/most-active overview built from bellwether symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub gainers: Vec<SummaryEntry>,
    pub losers: Vec<SummaryEntry>,
    pub most_active: Vec<SummaryEntry>,
    pub as_of: UtcDateTime,
}

/// Scanning facade owning the provider, cache, and universe.
pub struct Scanner {
    provider: Arc<dyn QuoteProvider>,
    fetcher: BatchFetcher,
    universe: SymbolUniverse,
    startup_warnings: Vec<String>,
}

impl Scanner {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        cache: Arc<dyn QuoteCache>,
        universe: SymbolUniverse,
        config: &ScannerConfig,
    ) -> Self {
        let fetcher = BatchFetcher::new(
            Arc::clone(&provider),
            cache,
            config.batch_size,
            config.inter_batch_delay,
            config.fetch_timeout,
        );
        Self {
            provider,
            fetcher,
            universe,
            startup_warnings: Vec::new(),
        }
    }

    /// Assemble a scanner from configuration: provider selected by available
    /// credentials, fresh in-memory cache, universe from file or built-in.
    pub fn from_config(config: &ScannerConfig) -> Self {
        let provider = config.build_provider();
        let cache: Arc<dyn QuoteCache> = Arc::new(MemoryQuoteCache::new(config.cache_ttl_seconds));
        let (universe, warning) = SymbolUniverse::load_or_builtin(config.universe_path.as_deref());

        let mut scanner = Self::new(provider, cache, universe, config);
        scanner.startup_warnings.extend(warning);
        scanner
    }

    pub fn universe(&self) -> &SymbolUniverse {
        &self.universe
    }

    pub fn provider(&self) -> &Arc<dyn QuoteProvider> {
        &self.provider
    }

    /// Resolve explicit symbols through the cache-backed batch fetcher.
    pub async fn quotes(&self, symbols: &[Symbol]) -> Vec<FetchOutcome> {
        self.fetcher.fetch_many(symbols).await
    }

    /// Run one scan pass. Never raises: parameter problems come back as
    /// `success: false`, individual symbol failures are simply absent from
    /// `stocks` while still counting toward `total_scanned`.
    pub async fn scan(&self, request: &ScanRequest) -> ScanOutcome {
        let started = Instant::now();

        if let Err(error) = request.validate() {
            return ScanOutcome::rejected(request, error, started);
        }

        let symbols = self.universe.sample(request.universe_size);
        let total_scanned = symbols.len();
        let outcomes = self.fetcher.fetch_many(&symbols).await;

        let mut warnings = self.startup_warnings.clone();
        let auth_failures = outcomes
            .iter()
            .filter_map(FetchOutcome::failure)
            .filter(|failure| failure.is_auth())
            .count();
        if auth_failures > 0 {
            warnings.push(format!(
                "{auth_failures} fetches rejected with an auth status; check the provider API key"
            ));
        }

        let mut survivors: Vec<ScoredQuote> = Vec::new();
        for outcome in outcomes {
            let Some(quote) = outcome.quote() else {
                continue;
            };

            // Overlay reference sector data when the upstream omits it.
            let quote = if quote.sector.is_none() {
                quote.clone().with_sector(
                    self.universe
                        .sector_of(&quote.symbol)
                        .map(String::from),
                )
            } else {
                quote.clone()
            };

            if !passes_bounds(
                &quote,
                request.min_price,
                request.max_price,
                request.min_volume,
                &request.sector,
            ) {
                continue;
            }
            if !request.scan_type.matches(&quote, request.min_volume) {
                continue;
            }

            let scored = ScoredQuote::from_quote(quote);
            if let Some(min_score) = request.min_score {
                if scored.score < min_score {
                    continue;
                }
            }
            survivors.push(scored);
        }

        let matches = survivors.len();
        let stocks = rank(survivors, request.limit);

        ScanOutcome {
            success: true,
            scan_type: request.scan_type,
            stocks,
            total_scanned,
            matches,
            processing_time_seconds: started.elapsed().as_secs_f64(),
            error: None,
            warnings,
            filters: ScanFilters::from_request(request),
        }
    }

    /// Bucket a handful of bellwether symbols into a quick market overview.
    pub async fn summary(&self) -> MarketSummary {
        let symbols: Vec<Symbol> = BELLWETHERS
            .iter()
            .map(|raw| Symbol::parse(raw).expect("bellwether symbols are valid"))
            .collect();

        let outcomes = self.fetcher.fetch_many(&symbols).await;

        let mut gainers = Vec::new();
        let mut losers = Vec::new();
        let mut most_active = Vec::new();

        for outcome in &outcomes {
            let Some(quote) = outcome.quote() else {
                continue;
            };
            let entry = SummaryEntry {
                symbol: quote.symbol.clone(),
                price: quote.price,
                change_percent: quote.change_percent,
                volume: quote.volume,
            };
            if quote.change_percent > 0.0 {
                gainers.push(entry.clone());
            } else {
                losers.push(entry.clone());
            }
            most_active.push(entry);
        }

        gainers.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent));
        losers.sort_by(|a, b| a.change_percent.total_cmp(&b.change_percent));
        most_active.sort_by(|a, b| b.volume.cmp(&a.volume));

        MarketSummary {
            gainers,
            losers,
            most_active,
            as_of: UtcDateTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_is_valid() {
        assert!(ScanRequest::new(ScanType::TopGainers).validate().is_ok());
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let request = ScanRequest::new(ScanType::All).with_price_range(100.0, 50.0);
        assert!(matches!(
            request.validate(),
            Err(ValidationError::InvertedPriceRange { .. })
        ));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let request = ScanRequest::new(ScanType::All).with_limit(0);
        assert!(matches!(request.validate(), Err(ValidationError::ZeroLimit)));
    }

    #[test]
    fn out_of_band_min_score_is_rejected() {
        let request = ScanRequest::new(ScanType::All).with_min_score(150.0);
        assert!(matches!(
            request.validate(),
            Err(ValidationError::ScoreOutOfRange { .. })
        ));
    }
}
