//! Behavior-driven tests for the demo quote generator.
//!
//! The demo provider stands in for real upstreams when no API key is
//! configured, so its output must be deterministic within a TTL bucket and
//! internally consistent like a real quote.

use tickscan_core::adapters::DemoProvider;
use tickscan_tests::{symbol, ProviderId};

// =============================================================================
// Demo Provider: Determinism
// =============================================================================

#[test]
fn same_symbol_and_bucket_always_produce_the_same_quote() {
    // Given: a demo provider and a fixed bucket
    let provider = DemoProvider::new(30);
    let aapl = symbol("AAPL");

    // When: the same quote is generated repeatedly
    let first = provider.quote_for_bucket(&aapl, 42);
    let second = provider.quote_for_bucket(&aapl, 42);

    // Then: every generated field is identical (as_of is the fetch time)
    assert_eq!(first.price, second.price);
    assert_eq!(first.previous_close, second.previous_close);
    assert_eq!(first.change_percent, second.change_percent);
    assert_eq!(first.volume, second.volume);
    assert_eq!(first.market_cap, second.market_cap);
}

#[test]
fn different_symbols_diverge_within_one_bucket() {
    let provider = DemoProvider::new(30);

    let aapl = provider.quote_for_bucket(&symbol("AAPL"), 42);
    let tsla = provider.quote_for_bucket(&symbol("TSLA"), 42);

    assert_ne!(aapl.price, tsla.price);
}

#[test]
fn bucket_rollover_reshuffles_the_quote() {
    // Given: one symbol observed across two TTL buckets
    let provider = DemoProvider::new(30);
    let nvda = symbol("NVDA");

    // When: the bucket advances
    let before = provider.quote_for_bucket(&nvda, 42);
    let after = provider.quote_for_bucket(&nvda, 43);

    // Then: the generated quote changes
    assert!(before.price != after.price || before.volume != after.volume);
}

// =============================================================================
// Demo Provider: Internal Consistency
// =============================================================================

#[test]
fn generated_quotes_are_internally_consistent() {
    let provider = DemoProvider::new(30);

    for raw in ["AAPL", "MSFT", "GOOGL", "PLTR", "BRK.B"] {
        for bucket in [0_u64, 7, 1_000_000] {
            let quote = provider.quote_for_bucket(&symbol(raw), bucket);

            assert!(quote.price > 0.0, "{raw}: price must be positive");
            assert!(quote.previous_close > 0.0);
            assert!(quote.volume >= 500_000, "{raw}: volume floor");

            let expected_change = quote.price - quote.previous_close;
            assert!(
                (quote.change - expected_change).abs() < 1e-9,
                "{raw}: change must equal price - previous_close"
            );

            let expected_percent = quote.change / quote.previous_close * 100.0;
            assert!(
                (quote.change_percent - expected_percent).abs() < 1e-9,
                "{raw}: change_percent must follow from change"
            );
        }
    }
}

#[tokio::test]
async fn fetched_demo_quotes_are_flagged_as_demo() {
    // Given: the demo provider used through the provider trait
    let provider = DemoProvider::new(30);
    let aapl = symbol("AAPL");

    // When: a quote is fetched
    let outcome = tickscan_core::provider::QuoteProvider::fetch_quote(&provider, &aapl).await;

    // Then: it resolves to a demo-sourced quote for the requested symbol
    let quote = outcome.quote().expect("demo fetches never fail");
    assert_eq!(quote.symbol.as_str(), "AAPL");
    assert_eq!(quote.source, ProviderId::Demo);
    assert!(quote.is_demo());
}
