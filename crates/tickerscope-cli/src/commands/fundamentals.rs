use serde::Serialize;
use tickerscope_core::{EnvelopeError, FundamentalsRecord, MarketDataService, MarketType};

use crate::cli::SymbolsArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct FundamentalsResponseData {
    fundamentals: Vec<FundamentalsView>,
}

#[derive(Debug, Serialize)]
struct FundamentalsView {
    raw: String,
    #[serde(flatten)]
    record: FundamentalsRecord,
}

pub async fn run(
    args: &SymbolsArgs,
    service: &MarketDataService,
    market: MarketType,
) -> Result<CommandResult, CliError> {
    let mut fundamentals = Vec::with_capacity(args.symbols.len());
    let mut errors = Vec::new();

    for raw in &args.symbols {
        match service.fetch_fundamentals(raw, market).await {
            Ok(record) => fundamentals.push(FundamentalsView {
                raw: raw.clone(),
                record,
            }),
            Err(error) => errors.push(EnvelopeError::from(&error)),
        }
    }

    let data = serde_json::to_value(FundamentalsResponseData { fundamentals })?;
    Ok(CommandResult::ok(data).with_errors(errors))
}
