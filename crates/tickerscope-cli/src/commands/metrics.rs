use serde::Serialize;
use tickerscope_core::{EnvelopeError, KeyMetrics, MarketDataService, MarketType};

use crate::cli::SymbolsArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct MetricsResponseData {
    metrics: Vec<KeyMetrics>,
}

pub async fn run(
    args: &SymbolsArgs,
    service: &MarketDataService,
    market: MarketType,
) -> Result<CommandResult, CliError> {
    let mut metrics = Vec::with_capacity(args.symbols.len());
    let mut errors = Vec::new();

    for raw in &args.symbols {
        match service.fetch_key_metrics(raw, market).await {
            Ok(row) => metrics.push(row),
            Err(error) => errors.push(EnvelopeError::from(&error)),
        }
    }

    let data = serde_json::to_value(MetricsResponseData { metrics })?;
    Ok(CommandResult::ok(data).with_errors(errors))
}
