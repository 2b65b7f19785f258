use tracing::debug;

use crate::data_source::{HistoryRequest, MarketDataProvider};
use crate::Symbol;

/// Check whether the provider recognizes `symbol` by issuing the cheapest
/// history query it accepts and discarding the rows.
///
/// Returns `true` iff the query succeeds with at least one row. Provider
/// errors never escape; they count as a negative answer.
pub async fn probe(provider: &dyn MarketDataProvider, symbol: &Symbol) -> bool {
    let request = HistoryRequest::probe(symbol.clone());
    match provider.history(&request).await {
        Ok(table) => {
            debug!(symbol = %symbol, rows = table.len(), provider = %provider.id(), "probe answered");
            !table.is_empty()
        }
        Err(error) => {
            debug!(symbol = %symbol, provider = %provider.id(), %error, "probe failed");
            false
        }
    }
}
