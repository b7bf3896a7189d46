//! Behavior-driven tests for TTL caching across scan passes.
//!
//! Within one TTL bucket the scanner must serve repeats from the cache
//! instead of refetching, for failures as well as quotes.

use std::sync::Arc;

use tickscan_tests::{
    fixture_quote, fixture_scanner, symbol, universe_of, FailureReason, FixtureProvider,
    ScanRequest, ScanType,
};

#[tokio::test]
async fn repeated_scan_within_ttl_issues_no_new_fetches() {
    // Given: a scanner with a long TTL
    let provider = Arc::new(FixtureProvider::new(vec![
        fixture_quote("AAPL", 190.0, 1.2, 50_000_000),
        fixture_quote("MSFT", 410.0, 0.8, 20_000_000),
        fixture_quote("NVDA", 120.0, 3.5, 80_000_000),
    ]));
    let scanner = fixture_scanner(Arc::clone(&provider), universe_of(&["AAPL", "MSFT", "NVDA"]));
    let request = ScanRequest::new(ScanType::TopGainers)
        .with_price_range(5.0, 500.0)
        .with_min_volume(1_000_000)
        .with_universe_size(3);

    // When: the identical scan runs twice
    let first = scanner.scan(&request).await;
    let calls_after_first = provider.calls();
    let second = scanner.scan(&request).await;

    // Then: the second pass is served entirely from the cache
    assert_eq!(calls_after_first, 3);
    assert_eq!(provider.calls(), calls_after_first);

    // And: both passes see the same underlying quote data
    assert_eq!(first.stocks.len(), second.stocks.len());
    for (a, b) in first.stocks.iter().zip(&second.stocks) {
        assert_eq!(a.quote, b.quote);
    }
}

#[tokio::test]
async fn explicit_quote_lookups_share_the_scan_cache() {
    // Given: a scanner whose universe was already scanned
    let provider = Arc::new(FixtureProvider::new(vec![fixture_quote(
        "AAPL", 190.0, 1.2, 50_000_000,
    )]));
    let scanner = fixture_scanner(Arc::clone(&provider), universe_of(&["AAPL"]));

    scanner
        .scan(
            &ScanRequest::new(ScanType::All)
                .with_price_range(5.0, 500.0)
                .with_min_volume(0)
                .with_universe_size(1),
        )
        .await;
    let calls_after_scan = provider.calls();

    // When: the same symbol is looked up directly
    let outcomes = scanner.quotes(&[symbol("AAPL")]).await;

    // Then: the lookup hits the cache, not the provider
    assert!(outcomes[0].is_quote());
    assert_eq!(provider.calls(), calls_after_scan);
}

#[tokio::test]
async fn timed_out_fetches_are_cached_within_the_bucket() {
    // Given: a provider whose fetch for one symbol hangs past the deadline
    let provider = Arc::new(FixtureProvider::new(vec![]).hanging("SLOW"));
    let scanner = fixture_scanner(Arc::clone(&provider), universe_of(&["SLOW"]));
    let slow = symbol("SLOW");

    // When: the symbol is fetched twice within one TTL bucket
    let first = scanner.quotes(&[slow.clone()]).await;
    let second = scanner.quotes(&[slow]).await;

    // Then: the timeout is stored like any other failure, so the second
    // pass never reaches the hanging upstream again
    assert_eq!(provider.calls(), 1);
    assert_eq!(
        first[0].failure().map(|f| f.reason),
        Some(FailureReason::Timeout)
    );
    assert_eq!(first[0], second[0]);
}

#[tokio::test]
async fn failed_fetches_are_cached_within_the_bucket() {
    // Given: a provider that rejects one symbol
    let provider =
        Arc::new(FixtureProvider::new(vec![]).failing("BAD", FailureReason::Http(503)));
    let scanner = fixture_scanner(Arc::clone(&provider), universe_of(&["BAD"]));
    let bad = symbol("BAD");

    // When: the symbol is fetched twice within one TTL bucket
    let first = scanner.quotes(&[bad.clone()]).await;
    let second = scanner.quotes(&[bad]).await;

    // Then: the failure was fetched once and served from cache afterwards
    assert_eq!(provider.calls(), 1);
    assert!(first[0].failure().is_some());
    assert_eq!(first[0], second[0]);
}
