//! Scripted provider shared by the behavior suites.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tickerscope_core::{
    Bar, FundamentalsRecord, HistoryRequest, MarketDataProvider, OhlcvTable, ProviderFuture,
    ProviderId, SourceError, Symbol, UtcDateTime, WindowSpec,
};

/// What the provider answers for one symbol.
#[derive(Debug, Clone)]
pub enum Script {
    Rows(usize),
    Empty,
    Fail(SourceError),
}

/// Provider answering from a per-symbol script and recording every call.
///
/// Symbols without a script come back empty.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    history: HashMap<String, Script>,
    fundamentals: HashMap<String, Result<FundamentalsRecord, SourceError>>,
    calls: Mutex<Vec<String>>,
    windows: Mutex<Vec<(String, WindowSpec)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, symbol: &str, script: Script) -> Self {
        self.history.insert(symbol.to_owned(), script);
        self
    }

    pub fn with_fundamentals(
        mut self,
        symbol: &str,
        outcome: Result<FundamentalsRecord, SourceError>,
    ) -> Self {
        self.fundamentals.insert(symbol.to_owned(), outcome);
        self
    }

    /// Every call so far, as `history:SYMBOL` or `fundamentals:SYMBOL`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn history_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix("history:").map(str::to_owned))
            .collect()
    }

    /// Symbol and window of every history request, in call order.
    pub fn history_windows(&self) -> Vec<(String, WindowSpec)> {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl MarketDataProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn history<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, OhlcvTable> {
        Box::pin(async move {
            self.record(format!("history:{}", req.symbol));
            self.windows
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((req.symbol.to_string(), req.window));
            let interval = req.window.interval();
            match self.history.get(req.symbol.as_str()) {
                Some(Script::Rows(count)) => Ok(OhlcvTable::new(
                    req.symbol.clone(),
                    interval,
                    rising_bars(*count),
                )),
                Some(Script::Fail(error)) => Err(error.clone()),
                Some(Script::Empty) | None => Ok(OhlcvTable::empty(req.symbol.clone(), interval)),
            }
        })
    }

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, FundamentalsRecord> {
        Box::pin(async move {
            self.record(format!("fundamentals:{symbol}"));
            match self.fundamentals.get(symbol.as_str()) {
                Some(outcome) => outcome.clone(),
                None => Ok(FundamentalsRecord::empty(symbol.clone())),
            }
        })
    }
}

/// Daily bars starting 2024-01-01 with closes 100, 101, 102, ...
pub fn rising_bars(count: usize) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let ts = UtcDateTime::from_unix_timestamp(1_704_067_200 + i as i64 * 86_400)
                .expect("valid timestamp");
            let close = 100.0 + i as f64;
            Bar::new(ts, close, close + 1.0, close - 1.0, close, 1_000).expect("valid bar")
        })
        .collect()
}
