//! Chunked concurrent quote fetching.
//!
//! Symbols are partitioned into fixed-size chunks; within a chunk every
//! fetch runs concurrently and the chunk is joined before the next one
//! starts. A fixed courtesy delay separates chunks. Batches are sequenced,
//! not pipelined, to bound the upstream request rate.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::cache::{get_or_fetch, QuoteCache};
use crate::provider::{FetchOutcome, QuoteProvider};
use crate::Symbol;

/// Fan-out/join fetcher over a provider and cache pair.
#[derive(Clone)]
pub struct BatchFetcher {
    provider: Arc<dyn QuoteProvider>,
    cache: Arc<dyn QuoteCache>,
    batch_size: usize,
    inter_batch_delay: Duration,
    fetch_timeout: Duration,
}

impl BatchFetcher {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        cache: Arc<dyn QuoteCache>,
        batch_size: usize,
        inter_batch_delay: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            batch_size: batch_size.max(1),
            inter_batch_delay,
            fetch_timeout,
        }
    }

    /// Resolve every symbol to exactly one outcome.
    ///
    /// A single symbol's failure never aborts the pass; it surfaces as a
    /// `Failed` outcome in the merged output. Output order is not
    /// meaningful — correlate by symbol.
    pub async fn fetch_many(&self, symbols: &[Symbol]) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(symbols.len());
        let chunk_total = chunk_count(symbols.len(), self.batch_size);

        for (index, chunk) in symbols.chunks(self.batch_size).enumerate() {
            let mut tasks = JoinSet::new();

            for symbol in chunk {
                let provider = Arc::clone(&self.provider);
                let cache = Arc::clone(&self.cache);
                let symbol = symbol.clone();
                let timeout = self.fetch_timeout;

                // The deadline lives inside get_or_fetch so an expired
                // fetch is cached as a Timeout failure for the bucket.
                tasks.spawn(async move {
                    get_or_fetch(cache.as_ref(), provider.as_ref(), &symbol, timeout).await
                });
            }

            while let Some(joined) = tasks.join_next().await {
                if let Ok(outcome) = joined {
                    outcomes.push(outcome);
                }
            }

            if index + 1 < chunk_total {
                tokio::time::sleep(self.inter_batch_delay).await;
            }
        }

        outcomes
    }
}

/// Number of fan-out chunks a symbol list produces: `ceil(n / batch_size)`.
pub fn chunk_count(symbol_count: usize, batch_size: usize) -> usize {
    symbol_count.div_ceil(batch_size.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cache::MemoryQuoteCache;
    use crate::provider::{FailureReason, ProviderId};
    use crate::{Quote, UtcDateTime};

    fn symbols(count: usize) -> Vec<Symbol> {
        (0..count)
            .map(|i| Symbol::parse(&format!("S{i}")).expect("valid"))
            .collect()
    }

    /// Provider that tracks peak in-flight concurrency and hangs forever on
    /// configured symbols.
    struct TrackingProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        hang_on: Vec<&'static str>,
    }

    impl TrackingProvider {
        fn new(hang_on: Vec<&'static str>) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                hang_on,
            }
        }
    }

    impl QuoteProvider for TrackingProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Demo
        }

        fn fetch_quote<'a>(
            &'a self,
            symbol: &'a Symbol,
        ) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
            Box::pin(async move {
                let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(current, Ordering::SeqCst);

                if self.hang_on.contains(&symbol.as_str()) {
                    // Outlives any per-fetch timeout.
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }

                tokio::task::yield_now().await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);

                FetchOutcome::Quote(
                    Quote::from_close_pair(
                        symbol.clone(),
                        100.0,
                        99.0,
                        2_000_000,
                        ProviderId::Demo,
                        UtcDateTime::now(),
                    )
                    .expect("valid quote"),
                )
            })
        }
    }

    fn fetcher(provider: Arc<dyn QuoteProvider>, batch_size: usize) -> BatchFetcher {
        BatchFetcher::new(
            provider,
            Arc::new(MemoryQuoteCache::new(3_600)),
            batch_size,
            Duration::from_millis(1),
            Duration::from_millis(200),
        )
    }

    #[test]
    fn chunk_count_is_ceiling_division() {
        assert_eq!(chunk_count(0, 20), 0);
        assert_eq!(chunk_count(1, 20), 1);
        assert_eq!(chunk_count(20, 20), 1);
        assert_eq!(chunk_count(21, 20), 2);
        assert_eq!(chunk_count(45, 20), 3);
    }

    #[tokio::test]
    async fn every_symbol_yields_exactly_one_outcome() {
        let provider = Arc::new(TrackingProvider::new(vec![]));
        let fetcher = fetcher(provider, 4);
        let input = symbols(10);

        let outcomes = fetcher.fetch_many(&input).await;
        assert_eq!(outcomes.len(), 10);

        let mut seen: Vec<&str> = outcomes.iter().map(|o| o.symbol().as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 10, "each input symbol appears exactly once");
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_batch_size() {
        let provider = Arc::new(TrackingProvider::new(vec![]));
        let fetcher = fetcher(Arc::clone(&provider) as Arc<dyn QuoteProvider>, 5);

        fetcher.fetch_many(&symbols(17)).await;
        assert!(provider.peak.load(Ordering::SeqCst) <= 5);
    }

    #[tokio::test]
    async fn hung_fetch_times_out_without_starving_the_rest() {
        let provider = Arc::new(TrackingProvider::new(vec!["S0"]));
        let fetcher = fetcher(provider, 4);
        let input = symbols(8);

        let outcomes = fetcher.fetch_many(&input).await;
        assert_eq!(outcomes.len(), 8);

        let timed_out = outcomes
            .iter()
            .find(|o| o.symbol().as_str() == "S0")
            .and_then(|o| o.failure())
            .expect("hung symbol must fail");
        assert_eq!(timed_out.reason, FailureReason::Timeout);

        let quotes = outcomes.iter().filter(|o| o.is_quote()).count();
        assert_eq!(quotes, 7, "other symbols still resolve");
    }
}
