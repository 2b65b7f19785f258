use serde::Serialize;
use tickerscope_core::indicators::{self, BOLLINGER_WINDOW};
use tickerscope_core::{
    EnvelopeError, IndicatorRow, MarketDataService, MarketType, OhlcvTable, WindowSpec,
};

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::CommandResult;

const DEFAULT_PERIOD: &str = "1mo";

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    window: String,
    series: Vec<SeriesView>,
}

#[derive(Debug, Serialize)]
struct SeriesView {
    raw: String,
    #[serde(flatten)]
    table: OhlcvTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    indicators: Option<Vec<IndicatorRow>>,
}

pub async fn run(
    args: &HistoryArgs,
    service: &MarketDataService,
    market: MarketType,
) -> Result<CommandResult, CliError> {
    let window = window_from_args(args)?;
    let entries = service
        .fetch_history_batch(&args.symbols, market, window)
        .await;

    let mut series = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();
    let mut short_series = Vec::new();

    for entry in entries {
        match entry.result {
            Ok(table) => {
                let indicators = if args.indicators {
                    Some(indicators::compute(&table)?)
                } else {
                    None
                };
                if args.indicators && table.len() < BOLLINGER_WINDOW {
                    short_series.push(entry.raw.clone());
                }
                series.push(SeriesView {
                    raw: entry.raw,
                    table,
                    indicators,
                });
            }
            Err(error) => errors.push(EnvelopeError::from(&error)),
        }
    }

    let data = serde_json::to_value(HistoryResponseData {
        window: window.to_string(),
        series,
    })?;

    let mut result = CommandResult::ok(data).with_errors(errors);
    if !short_series.is_empty() {
        result = result.with_warning(format!(
            "fewer than {BOLLINGER_WINDOW} rows for {}; windowed indicators are partly empty",
            short_series.join(", ")
        ));
    }
    Ok(result)
}

/// Last month of daily bars unless a period or any range bound was given.
fn window_from_args(args: &HistoryArgs) -> Result<WindowSpec, CliError> {
    let period = match (&args.period, &args.start, &args.end) {
        (None, None, None) => Some(DEFAULT_PERIOD),
        (period, _, _) => period.as_deref(),
    };
    let window = WindowSpec::from_parts(
        period,
        args.start.as_deref(),
        args.end.as_deref(),
        &args.interval,
    )?;
    Ok(window)
}
