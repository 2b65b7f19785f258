//! History and fundamentals retrieval with exchange fallback.
//!
//! Every fetch resolves the raw ticker first, then queries the provider. When
//! the resolved symbol is an NSE listing and the provider has nothing for it,
//! the same query is repeated once against the BSE listing. A symbol that
//! resolved straight to BSE gets no further fallback.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::data_source::{HistoryRequest, MarketDataProvider, SourceError};
use crate::metrics::KeyMetrics;
use crate::resolver::{Resolution, SymbolResolver};
use crate::{
    FetchError, FundamentalsRecord, MarketType, OhlcvTable, ProviderId, Symbol, WindowSpec,
    BSE_SUFFIX, NSE_SUFFIX,
};

/// Per-symbol outcome of a batch history fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub raw: String,
    pub result: Result<OhlcvTable, FetchError>,
}

impl BatchEntry {
    pub fn table(&self) -> Option<&OhlcvTable> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.result.as_ref().err()
    }
}

/// Provider plus resolver; the entry point for callers holding raw tickers.
///
/// Holds no per-call state, so one service can be shared by independent
/// callers.
#[derive(Clone)]
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    resolver: Arc<SymbolResolver>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_resolver(provider, SymbolResolver::new())
    }

    pub fn with_resolver(provider: Arc<dyn MarketDataProvider>, resolver: SymbolResolver) -> Self {
        Self {
            provider,
            resolver: Arc::new(resolver),
        }
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    pub async fn resolve(&self, raw: &str, market: MarketType) -> Result<Symbol, FetchError> {
        self.resolve_detailed(raw, market)
            .await
            .map(|resolution| resolution.symbol)
    }

    /// Resolve and report the rule that settled the symbol.
    pub async fn resolve_detailed(
        &self,
        raw: &str,
        market: MarketType,
    ) -> Result<Resolution, FetchError> {
        self.resolver
            .resolve_detailed(self.provider.as_ref(), raw, market)
            .await
            .map_err(|source| FetchError::Validation {
                symbol: raw.trim().to_owned(),
                source,
            })
    }

    /// Historical OHLCV rows for `raw` over `window`.
    ///
    /// # Errors
    ///
    /// [`FetchError::NoData`] naming `raw` when every attempt came back
    /// empty, [`FetchError::Provider`] when a provider call failed for any
    /// other reason, [`FetchError::Validation`] for unusable input.
    pub async fn fetch_history(
        &self,
        raw: &str,
        market: MarketType,
        window: WindowSpec,
    ) -> Result<OhlcvTable, FetchError> {
        let resolved = self.resolve(raw, market).await?;
        let mut tried = Vec::new();

        for symbol in fallback_chain(resolved) {
            let request = HistoryRequest::new(symbol.clone(), window);
            debug!(symbol = %symbol, %window, "requesting history");
            let outcome = self.provider.history(&request).await;
            tried.push(symbol.to_string());

            match outcome {
                Ok(table) if !table.is_empty() => {
                    info!(raw, symbol = %symbol, rows = table.len(), "history fetched");
                    return Ok(table);
                }
                Ok(_) => debug!(symbol = %symbol, "history came back empty"),
                Err(error) if error.is_not_found() => {
                    debug!(symbol = %symbol, %error, "provider has no such symbol");
                }
                Err(error) => return Err(provider_error(raw, error)),
            }
        }

        Err(no_data(raw, "history", &tried))
    }

    /// Snapshot fundamentals for `raw`. A record with no known field counts
    /// as empty for fallback purposes.
    pub async fn fetch_fundamentals(
        &self,
        raw: &str,
        market: MarketType,
    ) -> Result<FundamentalsRecord, FetchError> {
        let resolved = self.resolve(raw, market).await?;
        let mut tried = Vec::new();

        for symbol in fallback_chain(resolved) {
            debug!(symbol = %symbol, "requesting fundamentals");
            let outcome = self.provider.fundamentals(&symbol).await;
            tried.push(symbol.to_string());

            match outcome {
                Ok(record) if !record.is_empty() => {
                    info!(
                        raw,
                        symbol = %symbol,
                        fields = record.recognized_field_count(),
                        "fundamentals fetched"
                    );
                    return Ok(record);
                }
                Ok(_) => debug!(symbol = %symbol, "fundamentals came back empty"),
                Err(error) if error.is_not_found() => {
                    debug!(symbol = %symbol, %error, "provider has no such symbol");
                }
                Err(error) => return Err(provider_error(raw, error)),
            }
        }

        Err(no_data(raw, "fundamentals", &tried))
    }

    /// Latest price from the fundamentals snapshot; `None` when the provider
    /// knows the symbol but not its price.
    pub async fn fetch_current_price(
        &self,
        raw: &str,
        market: MarketType,
    ) -> Result<Option<f64>, FetchError> {
        self.fetch_fundamentals(raw, market)
            .await
            .map(|record| record.current_price)
    }

    /// Display-ready metrics row built from the fundamentals snapshot.
    pub async fn fetch_key_metrics(
        &self,
        raw: &str,
        market: MarketType,
    ) -> Result<KeyMetrics, FetchError> {
        let record = self.fetch_fundamentals(raw, market).await?;
        Ok(KeyMetrics::from_record(raw.trim(), &record))
    }

    /// Fetch several symbols one after another; a failure for one symbol is
    /// recorded in its entry and does not stop the rest.
    pub async fn fetch_history_batch<S>(
        &self,
        raws: &[S],
        market: MarketType,
        window: WindowSpec,
    ) -> Vec<BatchEntry>
    where
        S: AsRef<str>,
    {
        let mut entries = Vec::with_capacity(raws.len());
        for raw in raws {
            let raw = raw.as_ref();
            let result = self.fetch_history(raw, market, window).await;
            if let Err(error) = &result {
                warn!(raw, code = error.code(), %error, "skipping symbol in batch");
            }
            entries.push(BatchEntry {
                raw: raw.trim().to_owned(),
                result,
            });
        }
        entries
    }
}

/// The resolved symbol followed by its BSE twin when it is an NSE listing.
fn fallback_chain(resolved: Symbol) -> Vec<Symbol> {
    let bse = resolved.with_replaced_suffix(NSE_SUFFIX, BSE_SUFFIX);
    let mut chain = vec![resolved];
    chain.extend(bse);
    chain
}

fn provider_error(raw: &str, source: SourceError) -> FetchError {
    warn!(raw, code = source.code(), %source, "provider call failed");
    FetchError::Provider {
        symbol: raw.trim().to_owned(),
        source,
    }
}

fn no_data(raw: &str, what: &str, tried: &[String]) -> FetchError {
    warn!(raw, what, tried = ?tried, "no data after fallback");
    FetchError::NoData {
        symbol: raw.trim().to_owned(),
        detail: format!("provider returned no {what} (tried {})", tried.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nse_symbols_fall_back_to_bse() {
        let chain = fallback_chain(Symbol::parse("TCS.NS").expect("valid"));
        let chain = chain.iter().map(Symbol::as_str).collect::<Vec<_>>();
        assert_eq!(chain, vec!["TCS.NS", "TCS.BO"]);
    }

    #[test]
    fn bse_symbols_have_no_fallback() {
        let chain = fallback_chain(Symbol::parse("500325.BO").expect("valid"));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn no_data_error_names_raw_symbol() {
        let error = no_data(" reliance ", "history", &[String::from("RELIANCE.NS")]);
        assert_eq!(error.symbol(), "reliance");
        assert!(error.to_string().contains("tried RELIANCE.NS"));
    }
}
