//! Shared test support: a scriptable fixture provider and scanner builders.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use tickscan_core::cache::MemoryQuoteCache;
pub use tickscan_core::config::ScannerConfig;
pub use tickscan_core::provider::{
    FailureReason, FetchFailure, FetchOutcome, ProviderId, QuoteProvider,
};
pub use tickscan_core::scanner::{ScanRequest, ScanType, Scanner};
pub use tickscan_core::universe::{SymbolUniverse, UniverseEntry};
pub use tickscan_core::{Quote, Symbol, UtcDateTime};

pub fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid test symbol")
}

/// Quote with derived change fields, suitable for fixture tables.
pub fn fixture_quote(raw: &str, price: f64, change_percent: f64, volume: u64) -> Quote {
    let previous_close = price / (1.0 + change_percent / 100.0);
    Quote::new(
        symbol(raw),
        price,
        previous_close,
        price - previous_close,
        change_percent,
        volume,
        ProviderId::Fmp,
        UtcDateTime::now(),
    )
    .expect("valid fixture quote")
}

/// Provider scripted from a fixture table, with a call counter and
/// configurable per-symbol failures and hangs.
#[derive(Default)]
pub struct FixtureProvider {
    quotes: HashMap<Symbol, Quote>,
    failures: HashMap<Symbol, FailureReason>,
    hang_on: Vec<Symbol>,
    calls: AtomicUsize,
}

impl FixtureProvider {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: quotes
                .into_iter()
                .map(|quote| (quote.symbol.clone(), quote))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing(mut self, raw: &str, reason: FailureReason) -> Self {
        self.failures.insert(symbol(raw), reason);
        self
    }

    pub fn hanging(mut self, raw: &str) -> Self {
        self.hang_on.push(symbol(raw));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteProvider for FixtureProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Fmp
    }

    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.hang_on.contains(symbol) {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
            }
            if let Some(reason) = self.failures.get(symbol) {
                return FetchOutcome::Failed(FetchFailure::new(symbol.clone(), *reason, self.id()));
            }
            match self.quotes.get(symbol) {
                Some(quote) => FetchOutcome::Quote(quote.clone()),
                None => FetchOutcome::Failed(FetchFailure::new(
                    symbol.clone(),
                    FailureReason::NoData,
                    self.id(),
                )),
            }
        })
    }
}

/// Universe containing exactly the given symbols, no sector metadata.
pub fn universe_of(raws: &[&str]) -> SymbolUniverse {
    SymbolUniverse::new(
        raws.iter()
            .map(|raw| UniverseEntry {
                symbol: symbol(raw),
                sector: None,
                popular: false,
            })
            .collect(),
    )
}

/// Scanner over a fixture provider with test-friendly timings.
pub fn fixture_scanner(provider: Arc<FixtureProvider>, universe: SymbolUniverse) -> Scanner {
    let config = ScannerConfig {
        batch_size: 5,
        inter_batch_delay: Duration::from_millis(1),
        fetch_timeout: Duration::from_millis(200),
        cache_ttl_seconds: 3_600,
        ..ScannerConfig::default()
    };
    let cache = Arc::new(MemoryQuoteCache::new(config.cache_ttl_seconds));
    Scanner::new(provider, cache, universe, &config)
}
