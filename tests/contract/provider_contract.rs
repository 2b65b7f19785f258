//! Contract checks for the offline provider and the end-to-end flow over it.

use std::sync::Arc;

use time::macros::datetime;
use tickerscope_core::{
    probe, FixtureProvider, HistoryRequest, Interval, MarketDataProvider, MarketDataService,
    MarketType, Period, ProviderId, SourceError, SourceErrorKind, Symbol, WindowSpec,
};

fn provider() -> FixtureProvider {
    FixtureProvider::new().with_anchor(datetime!(2024-06-03 16:00 UTC))
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

#[tokio::test]
async fn fixture_reports_its_id() {
    assert_eq!(provider().id(), ProviderId::Fixture);
}

#[tokio::test]
async fn known_symbols_return_ordered_valid_bars() {
    let provider = provider();

    for raw in ["AAPL", "RELIANCE.NS", "BTC-USD", "GC=F", "^NSEI"] {
        let request = HistoryRequest::new(
            symbol(raw),
            WindowSpec::preset(Period::ThreeMonths, Interval::OneDay),
        );
        let table = provider.history(&request).await.expect("fixture history");

        assert!(!table.is_empty(), "{raw} should have rows");
        assert_eq!(table.symbol.as_str(), raw);
        assert!(table.bars.windows(2).all(|pair| pair[0].ts < pair[1].ts));
        for bar in &table.bars {
            assert!(bar.low <= bar.open && bar.open <= bar.high);
            assert!(bar.low <= bar.close && bar.close <= bar.high);
        }
    }
}

#[tokio::test]
async fn unknown_symbols_are_empty_not_errors() {
    let provider = provider();
    let unknown = symbol("ZZZNOPE.NS");

    let table = provider
        .history(&HistoryRequest::probe(unknown.clone()))
        .await
        .expect("empty table");
    let record = provider.fundamentals(&unknown).await.expect("empty record");

    assert!(table.is_empty());
    assert!(record.is_empty());
}

#[tokio::test]
async fn probe_follows_the_universe() {
    let provider = provider()
        .with_failure("TCS.BO", SourceError::unavailable("simulated outage"));

    assert!(probe(&provider, &symbol("TCS.NS")).await);
    assert!(!probe(&provider, &symbol("TCS.BO")).await);
    assert!(!probe(&provider, &symbol("ZZZNOPE.NS")).await);
}

#[tokio::test]
async fn injected_failures_keep_their_kind() {
    let provider = provider().with_failure("AAPL", SourceError::rate_limited("slow down"));

    let error = provider
        .history(&HistoryRequest::probe(symbol("AAPL")))
        .await
        .expect_err("injected failure");

    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert!(error.retryable());
}

#[tokio::test]
async fn reliance_resolves_and_fetches_a_month_of_rows() {
    // Given: The offline provider behind the service
    let service = MarketDataService::new(Arc::new(provider()));

    // When: A bare Indian ticker is fetched for the default window
    let table = service
        .fetch_history("RELIANCE", MarketType::Indian, WindowSpec::default())
        .await
        .expect("fixture rows");

    // Then: Roughly a month of ascending, positive closes under the NSE listing
    assert_eq!(table.symbol.as_str(), "RELIANCE.NS");
    assert!(table.len() >= 20, "expected a month of rows, got {}", table.len());
    assert!(table.bars.windows(2).all(|pair| pair[0].ts < pair[1].ts));
    assert!(table.closes().iter().all(|close| *close > 0.0));
}

#[tokio::test]
async fn bse_only_listing_is_found_through_fallback() {
    let service = MarketDataService::new(Arc::new(provider()));

    let table = service
        .fetch_history("SUZLON", MarketType::Indian, WindowSpec::default())
        .await
        .expect("BSE rows");

    assert_eq!(table.symbol.as_str(), "SUZLON.BO");
}

#[tokio::test]
async fn unknown_ticker_ends_in_no_data() {
    let service = MarketDataService::new(Arc::new(provider()));

    let error = service
        .fetch_history("ZZZNOPE", MarketType::Indian, WindowSpec::default())
        .await
        .expect_err("unknown everywhere");

    assert!(error.is_no_data());
    assert_eq!(error.symbol(), "ZZZNOPE");
}
