use serde::Serialize;
use tickerscope_core::{EnvelopeError, MarketDataService, MarketType};

use crate::cli::SymbolsArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct PriceResponseData {
    prices: Vec<PriceView>,
}

#[derive(Debug, Serialize)]
struct PriceView {
    raw: String,
    price: Option<f64>,
}

pub async fn run(
    args: &SymbolsArgs,
    service: &MarketDataService,
    market: MarketType,
) -> Result<CommandResult, CliError> {
    let mut prices = Vec::with_capacity(args.symbols.len());
    let mut missing = Vec::new();
    let mut errors = Vec::new();

    for raw in &args.symbols {
        match service.fetch_current_price(raw, market).await {
            Ok(price) => {
                if price.is_none() {
                    missing.push(raw.clone());
                }
                prices.push(PriceView {
                    raw: raw.clone(),
                    price,
                });
            }
            Err(error) => errors.push(EnvelopeError::from(&error)),
        }
    }

    let data = serde_json::to_value(PriceResponseData { prices })?;
    let mut result = CommandResult::ok(data).with_errors(errors);
    if !missing.is_empty() {
        result = result.with_warning(format!(
            "provider reported no current price for {}",
            missing.join(", ")
        ));
    }
    Ok(result)
}
