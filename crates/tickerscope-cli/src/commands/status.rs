use serde::Serialize;
use tickerscope_core::{is_market_open, MarketType, UtcDateTime};
use time::OffsetDateTime;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct StatusResponseData {
    checked_at: UtcDateTime,
    markets: Vec<MarketStatus>,
}

#[derive(Debug, Serialize)]
struct MarketStatus {
    market: MarketType,
    label: &'static str,
    open: bool,
}

pub fn run() -> Result<CommandResult, CliError> {
    let now = OffsetDateTime::now_utc();
    let markets = MarketType::ALL
        .into_iter()
        .map(|market| MarketStatus {
            market,
            label: market.label(),
            open: is_market_open(market, now),
        })
        .collect();

    let data = serde_json::to_value(StatusResponseData {
        checked_at: UtcDateTime::from(now),
        markets,
    })?;
    Ok(CommandResult::ok(data))
}
