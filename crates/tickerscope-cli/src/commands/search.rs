use serde::Serialize;
use tickerscope_core::{search_symbols, MarketType, SymbolSuggestion};

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SearchResponseData {
    query: String,
    market: MarketType,
    results: Vec<SymbolSuggestion>,
}

pub fn run(args: &SearchArgs, market: MarketType) -> Result<CommandResult, CliError> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::Command(String::from("query must not be empty")));
    }

    let data = serde_json::to_value(SearchResponseData {
        query: query.to_owned(),
        market,
        results: search_symbols(query, market),
    })?;
    Ok(CommandResult::ok(data))
}
