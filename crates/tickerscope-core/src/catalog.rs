//! Offline symbol suggestions and listing classification.

use serde::Serialize;

use crate::resolver::{looks_indian, DEFAULT_SPECIAL_CASES};
use crate::{MarketType, BSE_SUFFIX, COMMODITY_SUFFIX, CRYPTO_SUFFIX, NSE_SUFFIX};

pub const MAX_SUGGESTIONS: usize = 10;

/// One entry of the suggestion catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolSuggestion {
    pub symbol: &'static str,
    pub name: &'static str,
    pub exchange: &'static str,
}

const GLOBAL: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("META", "Meta Platforms Inc."),
    ("TSLA", "Tesla Inc."),
    ("NVDA", "NVIDIA Corporation"),
];

const INDIAN: &[(&str, &str)] = &[
    ("RELIANCE.NS", "Reliance Industries"),
    ("TCS.NS", "Tata Consultancy Services"),
    ("INFY.NS", "Infosys Limited"),
    ("HDFCBANK.NS", "HDFC Bank Limited"),
    ("WIPRO.NS", "Wipro Limited"),
    ("TATAMOTORS.NS", "Tata Motors Limited"),
];

const CRYPTO: &[(&str, &str)] = &[
    ("BTC-USD", "Bitcoin USD"),
    ("ETH-USD", "Ethereum USD"),
    ("USDT-USD", "Tether USD"),
    ("BNB-USD", "Binance Coin USD"),
    ("XRP-USD", "Ripple USD"),
    ("DOGE-USD", "Dogecoin USD"),
];

const COMMODITIES: &[(&str, &str)] = &[
    ("GC=F", "Gold Futures"),
    ("SI=F", "Silver Futures"),
    ("CL=F", "Crude Oil Futures"),
    ("NG=F", "Natural Gas Futures"),
    ("ZC=F", "Corn Futures"),
    ("ZW=F", "Wheat Futures"),
];

type Catalog = &'static [(&'static str, &'static str)];

/// Catalog, exchange label and suffix for a market.
fn entries(market: MarketType) -> (Catalog, &'static str, &'static str) {
    match market {
        MarketType::Global => (GLOBAL, "NASDAQ/NYSE", ""),
        MarketType::Indian => (INDIAN, "NSE", NSE_SUFFIX),
        MarketType::Crypto => (CRYPTO, "Crypto", CRYPTO_SUFFIX),
        MarketType::Commodity => (COMMODITIES, "Commodities", COMMODITY_SUFFIX),
    }
}

/// Catalog entries whose bare ticker contains `query` (case-insensitive) or
/// whose name contains it. At most [`MAX_SUGGESTIONS`] results.
pub fn search_symbols(query: &str, market: MarketType) -> Vec<SymbolSuggestion> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let upper = query.to_ascii_uppercase();
    let lower = query.to_ascii_lowercase();
    let (catalog, exchange, suffix) = entries(market);

    catalog
        .iter()
        .filter(|(symbol, name)| {
            let bare = symbol.strip_suffix(suffix).unwrap_or(*symbol);
            bare.contains(&upper) || name.to_ascii_lowercase().contains(&lower)
        })
        .take(MAX_SUGGESTIONS)
        .map(|&(symbol, name)| SymbolSuggestion {
            symbol,
            name,
            exchange,
        })
        .collect()
}

/// True for tickers that carry an Indian exchange suffix, match a known
/// Indian alias, or trip the digit/`&`/`-` heuristic.
pub fn is_indian_stock(symbol: &str) -> bool {
    let symbol = symbol.trim().to_ascii_uppercase();
    symbol.ends_with(NSE_SUFFIX)
        || symbol.ends_with(BSE_SUFFIX)
        || DEFAULT_SPECIAL_CASES
            .iter()
            .any(|(alias, _)| *alias == symbol)
        || looks_indian(&symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_bare_ticker_without_suffix() {
        let results = search_symbols("rel", MarketType::Indian);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "RELIANCE.NS");
        assert_eq!(results[0].exchange, "NSE");

        // The suffix itself is not searchable.
        assert!(search_symbols(".NS", MarketType::Indian).is_empty());
    }

    #[test]
    fn matches_company_name() {
        let results = search_symbols("tata", MarketType::Indian);
        let symbols = results.iter().map(|s| s.symbol).collect::<Vec<_>>();
        assert_eq!(symbols, vec!["TCS.NS", "TATAMOTORS.NS"]);
    }

    #[test]
    fn catalog_is_market_specific() {
        assert!(search_symbols("gold", MarketType::Global).is_empty());
        assert_eq!(search_symbols("gold", MarketType::Commodity)[0].symbol, "GC=F");
        assert_eq!(search_symbols("btc", MarketType::Crypto)[0].symbol, "BTC-USD");
    }

    #[test]
    fn results_are_capped() {
        // Every global entry contains an 'a' or 'A' somewhere.
        assert!(search_symbols("a", MarketType::Global).len() <= MAX_SUGGESTIONS);
        assert!(search_symbols("   ", MarketType::Global).is_empty());
    }

    #[test]
    fn classifies_indian_listings() {
        assert!(is_indian_stock("TCS.NS"));
        assert!(is_indian_stock("500325.BO"));
        assert!(is_indian_stock("irctc"));
        assert!(is_indian_stock("M&M"));
        assert!(!is_indian_stock("AAPL"));
    }
}
