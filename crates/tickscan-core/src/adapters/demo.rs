use std::future::Future;
use std::pin::Pin;

use crate::provider::{FetchOutcome, ProviderId, QuoteProvider};
use crate::{Quote, Symbol, UtcDateTime};

/// Deterministic offline quote generator.
///
/// Used whenever no provider API key is configured so the scanner stays
/// exercisable without credentials. Quotes are drawn from a seeded PRNG
/// keyed by (symbol, time bucket): within one bucket the same symbol always
/// produces the identical quote, and a new bucket reshuffles the tape. The
/// generated fields are internally consistent (price > 0, change equals
/// price minus previous close, change_percent follows from the pair).
#[derive(Debug, Clone)]
pub struct DemoProvider {
    bucket_seconds: u64,
}

impl DemoProvider {
    pub fn new(bucket_seconds: u64) -> Self {
        Self {
            bucket_seconds: bucket_seconds.max(1),
        }
    }

    /// Current bucket index for this provider's bucket width.
    pub fn current_bucket(&self) -> u64 {
        let now = UtcDateTime::now().unix_timestamp().max(0) as u64;
        now / self.bucket_seconds
    }

    /// Deterministic quote for an explicit bucket. Exposed so tests can pin
    /// the bucket instead of racing the wall clock.
    pub fn quote_for_bucket(&self, symbol: &Symbol, bucket: u64) -> Quote {
        let seed = fnv1a(symbol.as_str().as_bytes()) ^ bucket.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        let mut rng = fastrand::Rng::with_seed(seed);

        let previous_close = round_cents(5.0 + rng.f64() * 495.0);
        let drift_percent = rng.f64() * 16.0 - 8.0;
        let price = round_cents((previous_close * (1.0 + drift_percent / 100.0)).max(0.01));
        let volume = 500_000 + rng.u64(0..60_000_000);

        let day_high = round_cents(price.max(previous_close) * (1.0 + rng.f64() * 0.02));
        let day_low = round_cents((price.min(previous_close) * (1.0 - rng.f64() * 0.02)).max(0.01));
        let shares_outstanding = 100_000_000.0 + rng.f64() * 4_900_000_000.0;

        Quote::from_close_pair(
            symbol.clone(),
            price,
            previous_close,
            volume,
            ProviderId::Demo,
            UtcDateTime::now(),
        )
        .expect("demo generator always produces a positive price")
        .with_day_range(Some(day_high), Some(day_low))
        .with_market_cap(Some(price * shares_outstanding))
        .with_pe_ratio(Some(round_cents(8.0 + rng.f64() * 37.0)))
        .with_company_name(Some(format!("{} Inc.", symbol.as_str())))
    }
}

impl QuoteProvider for DemoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Demo
    }

    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
        Box::pin(async move {
            FetchOutcome::Quote(self.quote_for_bucket(symbol, self.current_bucket()))
        })
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
