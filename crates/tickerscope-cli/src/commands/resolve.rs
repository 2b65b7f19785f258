use serde::Serialize;
use tickerscope_core::{EnvelopeError, MarketDataService, MarketType};

use crate::cli::SymbolsArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ResolveResponseData {
    market: MarketType,
    resolutions: Vec<ResolutionView>,
}

#[derive(Debug, Serialize)]
struct ResolutionView {
    raw: String,
    symbol: String,
    rule: &'static str,
    probes: usize,
}

pub async fn run(
    args: &SymbolsArgs,
    service: &MarketDataService,
    market: MarketType,
) -> Result<CommandResult, CliError> {
    let mut resolutions = Vec::with_capacity(args.symbols.len());
    let mut errors = Vec::new();

    for raw in &args.symbols {
        match service.resolve_detailed(raw, market).await {
            Ok(resolution) => resolutions.push(ResolutionView {
                raw: raw.clone(),
                symbol: resolution.symbol.into(),
                rule: resolution.rule,
                probes: resolution.probes,
            }),
            Err(error) => errors.push(EnvelopeError::from(&error)),
        }
    }

    let data = serde_json::to_value(ResolveResponseData {
        market,
        resolutions,
    })?;
    Ok(CommandResult::ok(data).with_errors(errors))
}
