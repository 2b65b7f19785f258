//! Behavior-driven tests for ticker resolution
//!
//! These tests verify HOW raw tickers become provider symbols in each market:
//! fixed suffixes, probing order for Indian listings, and aliases.

use std::sync::Arc;

use tickerscope_core::{MarketDataService, MarketType, SourceError, SymbolResolver, ValidationError};

use tickerscope_tests::support::{Script, ScriptedProvider};

async fn resolve(provider: &ScriptedProvider, raw: &str, market: MarketType) -> String {
    SymbolResolver::new()
        .resolve(provider, raw, market)
        .await
        .expect("valid ticker")
        .to_string()
}

// =============================================================================
// Fixed-suffix markets
// =============================================================================

#[tokio::test]
async fn when_crypto_ticker_is_bare_resolver_quotes_it_in_usd() {
    // Given: A provider that knows nothing
    let provider = ScriptedProvider::new();

    // When: Crypto tickers are resolved
    let btc = resolve(&provider, "BTC", MarketType::Crypto).await;
    let lower = resolve(&provider, " eth ", MarketType::Crypto).await;

    // Then: The USD pair is used without asking the provider
    assert_eq!(btc, "BTC-USD");
    assert_eq!(lower, "ETH-USD");
    assert!(provider.calls().is_empty(), "crypto resolution never probes");
}

#[tokio::test]
async fn when_commodity_ticker_is_bare_resolver_uses_the_futures_contract() {
    let provider = ScriptedProvider::new();

    assert_eq!(resolve(&provider, "GC", MarketType::Commodity).await, "GC=F");
    assert_eq!(resolve(&provider, "CL=F", MarketType::Commodity).await, "CL=F");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn when_market_is_global_resolver_passes_ticker_through() {
    let provider = ScriptedProvider::new();

    assert_eq!(resolve(&provider, "AAPL", MarketType::Global).await, "AAPL");
    assert_eq!(resolve(&provider, "^GSPC", MarketType::Indian).await, "^GSPC");
}

// =============================================================================
// Indian listings
// =============================================================================

#[tokio::test]
async fn when_indian_ticker_is_plain_resolver_appends_nse_without_probing() {
    // Given: A provider that knows nothing
    let provider = ScriptedProvider::new();

    // When: A plain ticker is resolved in the Indian market
    let symbol = resolve(&provider, "TCS", MarketType::Indian).await;

    // Then: NSE is assumed and the provider was never asked
    assert_eq!(symbol, "TCS.NS");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn when_ticker_looks_indian_resolver_probes_nse_first() {
    // Given: A provider that has rows for the NSE listing
    let provider = ScriptedProvider::new().with_history("M&M.NS", Script::Rows(1));

    // When: A ticker containing '&' is resolved
    let symbol = resolve(&provider, "M&M", MarketType::Indian).await;

    // Then: NSE wins on the first probe
    assert_eq!(symbol, "M&M.NS");
    assert_eq!(provider.history_calls(), vec!["M&M.NS"]);
}

#[tokio::test]
async fn when_only_bse_answers_resolver_picks_bse() {
    // Given: NSE is empty, BSE has rows
    let provider = ScriptedProvider::new().with_history("500325.BO", Script::Rows(1));

    // When: A numeric scrip code is resolved
    let symbol = resolve(&provider, "500325", MarketType::Indian).await;

    // Then: NSE was probed first, then BSE was chosen
    assert_eq!(symbol, "500325.BO");
    assert_eq!(provider.history_calls(), vec!["500325.NS", "500325.BO"]);
}

#[tokio::test]
async fn when_no_listing_answers_resolver_defaults_to_nse() {
    // Given: Neither listing has rows
    let provider = ScriptedProvider::new();

    // When / Then: The NSE form is returned after both probes
    assert_eq!(resolve(&provider, "BAJAJ-AUTO", MarketType::Indian).await, "BAJAJ-AUTO.NS");
    assert_eq!(provider.history_calls(), vec!["BAJAJ-AUTO.NS", "BAJAJ-AUTO.BO"]);
}

#[tokio::test]
async fn when_probe_fails_resolver_treats_it_as_a_miss() {
    // Given: The NSE probe fails at the transport level
    let provider = ScriptedProvider::new()
        .with_history(
            "M&MFIN.NS",
            Script::Fail(SourceError::unavailable("connection reset")),
        )
        .with_history("M&MFIN.BO", Script::Rows(1));

    // When / Then: Resolution moves on to BSE instead of failing
    assert_eq!(resolve(&provider, "M&MFIN", MarketType::Indian).await, "M&MFIN.BO");
}

#[tokio::test]
async fn when_special_case_has_no_answer_resolution_falls_through() {
    // Given: Neither IRCTC listing answers
    let provider = ScriptedProvider::new();

    // When / Then: The Indian default applies after both probes
    assert_eq!(resolve(&provider, "IRCTC", MarketType::Indian).await, "IRCTC.NS");
    assert_eq!(provider.history_calls(), vec!["IRCTC.NS", "IRCTC.BO"]);
}

#[tokio::test]
async fn when_special_case_nse_is_missing_bse_is_used() {
    let provider = ScriptedProvider::new().with_history("IRCTC.BO", Script::Rows(1));

    assert_eq!(resolve(&provider, "IRCTC", MarketType::Indian).await, "IRCTC.BO");
}

#[tokio::test]
async fn when_special_case_is_requested_its_preference_order_applies() {
    // Given: Both IRCTC listings exist
    let provider = ScriptedProvider::new()
        .with_history("IRCTC.NS", Script::Rows(1))
        .with_history("IRCTC.BO", Script::Rows(1));

    // When / Then: The first preferred listing wins
    assert_eq!(resolve(&provider, "irctc", MarketType::Indian).await, "IRCTC.NS");
}

#[tokio::test]
async fn when_index_alias_is_requested_the_index_symbol_is_used() {
    let provider = ScriptedProvider::new()
        .with_history("^NSEI", Script::Rows(1))
        .with_history("^BSESN", Script::Rows(1));

    assert_eq!(resolve(&provider, "NIFTY50", MarketType::Indian).await, "^NSEI");
    assert_eq!(resolve(&provider, "SENSEX", MarketType::Indian).await, "^BSESN");
}

#[tokio::test]
async fn when_index_alias_is_requested_outside_india_it_still_applies() {
    // Given: The index answers probes
    let provider = ScriptedProvider::new().with_history("^NSEI", Script::Rows(1));

    // When/Then: Crypto and commodity selections honor the alias table too
    assert_eq!(resolve(&provider, "NIFTY50", MarketType::Crypto).await, "^NSEI");
    assert_eq!(resolve(&provider, "nifty50", MarketType::Commodity).await, "^NSEI");
}

#[tokio::test]
async fn when_alias_does_not_answer_in_crypto_market_the_pair_suffix_is_used() {
    let provider = ScriptedProvider::new();

    assert_eq!(resolve(&provider, "IRCTC", MarketType::Crypto).await, "IRCTC-USD");
    assert_eq!(provider.history_calls(), vec!["IRCTC.NS", "IRCTC.BO"]);
}

#[tokio::test]
async fn when_symbol_already_carries_a_suffix_resolution_is_stable() {
    // Given: A provider that knows nothing
    let provider = ScriptedProvider::new();

    // When: Already resolved symbols are resolved again
    for (raw, market) in [
        ("RELIANCE.NS", MarketType::Indian),
        ("RELIANCE.BO", MarketType::Indian),
        ("BTC-USD", MarketType::Crypto),
        ("GC=F", MarketType::Commodity),
    ] {
        let once = resolve(&provider, raw, market).await;
        let twice = resolve(&provider, &once, market).await;

        // Then: The symbol is unchanged and no probe was needed
        assert_eq!(once, raw);
        assert_eq!(twice, raw);
    }
    assert!(provider.calls().is_empty());
}

// =============================================================================
// Invalid input
// =============================================================================

#[tokio::test]
async fn when_ticker_is_at_the_length_limit_suffixed_candidates_stay_valid() {
    // Given: A 20-character bare ticker and a provider that knows nothing
    let provider = ScriptedProvider::new();
    let raw = "ABCDEFGHIJKLMNOPQRST";

    // When/Then: Every market decorates it without a validation error
    assert_eq!(
        resolve(&provider, raw, MarketType::Indian).await,
        format!("{raw}.NS")
    );
    assert_eq!(
        resolve(&provider, raw, MarketType::Crypto).await,
        format!("{raw}-USD")
    );
    assert_eq!(
        resolve(&provider, raw, MarketType::Commodity).await,
        format!("{raw}=F")
    );
}

#[tokio::test]
async fn when_ticker_exceeds_the_length_limit_the_input_length_is_reported() {
    let provider = ScriptedProvider::new();

    let error = SymbolResolver::new()
        .resolve(&provider, "ABCDEFGHIJKLMNOPQRSTU", MarketType::Indian)
        .await
        .expect_err("too long");

    assert_eq!(error, ValidationError::SymbolTooLong { len: 21, max: 20 });
}

#[tokio::test]
async fn when_ticker_is_blank_resolution_is_rejected() {
    let provider = ScriptedProvider::new();

    let error = SymbolResolver::new()
        .resolve(&provider, "   ", MarketType::Indian)
        .await
        .expect_err("blank ticker");

    assert_eq!(error, ValidationError::EmptySymbol);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn when_service_resolves_it_reports_the_settling_rule() {
    let service = MarketDataService::new(Arc::new(
        ScriptedProvider::new().with_history("BAJAJ-AUTO.NS", Script::Rows(1)),
    ));

    let resolution = service
        .resolve_detailed("bajaj-auto", MarketType::Indian)
        .await
        .expect("valid ticker");

    assert_eq!(resolution.symbol.as_str(), "BAJAJ-AUTO.NS");
    assert_eq!(resolution.rule, "indian_heuristic");
    assert_eq!(resolution.probes, 1);
}
