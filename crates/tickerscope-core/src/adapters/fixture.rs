use std::collections::{BTreeSet, HashMap};

use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::data_source::{HistoryRequest, MarketDataProvider, ProviderFuture, SourceError};
use crate::{
    Bar, FundamentalsRecord, OhlcvTable, ProviderId, Symbol, UtcDateTime, ValidationError,
    WindowSpec,
};

const MAX_ROWS: usize = 500;

/// Symbols the offline provider knows out of the box.
///
/// `SUZLON` and the numeric code `500325` are listed on BSE only, and
/// `IRCTC` is listed on both exchanges.
const DEFAULT_UNIVERSE: &[&str] = &[
    "AAPL",
    "MSFT",
    "GOOGL",
    "AMZN",
    "TSLA",
    "^GSPC",
    "RELIANCE.NS",
    "TCS.NS",
    "INFY.NS",
    "HDFCBANK.NS",
    "M&M.NS",
    "BAJAJ-AUTO.NS",
    "IRCTC.NS",
    "IRCTC.BO",
    "SUZLON.BO",
    "500325.BO",
    "^NSEI",
    "^BSESN",
    "BTC-USD",
    "ETH-USD",
    "SOL-USD",
    "GC=F",
    "SI=F",
    "CL=F",
];

/// Deterministic offline provider.
///
/// Known symbols get synthetic bars seeded by the symbol text; unknown
/// symbols get an empty table and an empty fundamentals record, the same
/// shape a real provider returns for a ticker it has never heard of.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    universe: BTreeSet<Symbol>,
    failures: HashMap<Symbol, SourceError>,
    anchor: Option<OffsetDateTime>,
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self::empty().with_symbols(DEFAULT_UNIVERSE.iter().copied())
    }
}

impl FixtureProvider {
    /// Provider seeded with the default universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that knows no symbols at all.
    pub fn empty() -> Self {
        Self {
            universe: BTreeSet::new(),
            failures: HashMap::new(),
            anchor: None,
        }
    }

    pub fn with_symbols<'a>(mut self, symbols: impl IntoIterator<Item = &'a str>) -> Self {
        self.universe
            .extend(symbols.into_iter().filter_map(|raw| Symbol::parse(raw).ok()));
        self
    }

    pub fn without_symbol(mut self, symbol: &str) -> Self {
        if let Ok(symbol) = Symbol::parse(symbol) {
            self.universe.remove(&symbol);
        }
        self
    }

    /// Make every call for `symbol` fail with `error`.
    pub fn with_failure(mut self, symbol: &str, error: SourceError) -> Self {
        if let Ok(symbol) = Symbol::parse(symbol) {
            self.failures.insert(symbol, error);
        }
        self
    }

    /// Pin "now" for preset windows so generated timestamps are reproducible.
    pub fn with_anchor(mut self, anchor: OffsetDateTime) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn knows(&self, symbol: &Symbol) -> bool {
        self.universe.contains(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.universe.iter()
    }

    fn check_failure(&self, symbol: &Symbol) -> Result<(), SourceError> {
        match self.failures.get(symbol) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn build_history(&self, req: &HistoryRequest) -> Result<OhlcvTable, SourceError> {
        self.check_failure(&req.symbol)?;

        let interval = req.window.interval();
        if !self.knows(&req.symbol) {
            debug!(symbol = %req.symbol, "fixture has no such symbol");
            return Ok(OhlcvTable::empty(req.symbol.clone(), interval));
        }

        let step = interval.duration();
        let (first, count) = match req.window {
            WindowSpec::Preset { period, .. } => {
                let now = self.anchor.unwrap_or_else(OffsetDateTime::now_utc);
                let count = period
                    .approx_span()
                    .map(|span| rows_in(span, step))
                    .unwrap_or(MAX_ROWS);
                (now - step * (count.saturating_sub(1) as i32), count)
            }
            WindowSpec::Range { start, end, .. } => {
                let first = start.midnight().assume_utc();
                let count = rows_in(end.midnight().assume_utc() - first, step);
                (first, count)
            }
        };

        let seed = symbol_seed(&req.symbol);
        let scale = price_scale(&req.symbol);
        let mut bars = Vec::with_capacity(count);
        for index in 0..count {
            let ts = UtcDateTime::from(first + step * (index as i32));
            let base = (90.0 + ((seed + index as u64) % 350) as f64 / 10.0) * scale;
            let bar = Bar::new(
                ts,
                base,
                base + 1.20 * scale,
                base - 0.80 * scale,
                base + 0.30 * scale,
                20_000 + (index as u64) * 25,
            )
            .map_err(validation_to_error)?;
            bars.push(bar);
        }

        Ok(OhlcvTable::new(req.symbol.clone(), interval, bars))
    }

    fn build_fundamentals(&self, symbol: &Symbol) -> Result<FundamentalsRecord, SourceError> {
        self.check_failure(symbol)?;

        if !self.knows(symbol) {
            return Ok(FundamentalsRecord::empty(symbol.clone()));
        }

        let seed = symbol_seed(symbol);
        let scale = price_scale(symbol);
        let mut record = FundamentalsRecord {
            symbol: Some(symbol.clone()),
            current_price: Some((92.0 + (seed % 500) as f64 / 10.0) * scale),
            volume: Some(50_000 + seed % 10_000),
            average_volume: Some(60_000 + seed % 20_000),
            ..FundamentalsRecord::default()
        };

        // Indices, pairs and futures carry prices but no company financials.
        if !symbol.is_index() && !symbol.has_suffix("-USD") && !symbol.has_suffix("=F") {
            record.market_cap = Some(500_000_000_000.0 + (seed % 300_000) as f64 * 1_000_000.0);
            record.trailing_pe = Some(14.0 + (seed % 200) as f64 / 10.0);
            record.dividend_yield = Some(0.005 + (seed % 50) as f64 / 10_000.0);
            record.beta = Some(0.6 + (seed % 90) as f64 / 100.0);
        }

        Ok(record)
    }
}

impl MarketDataProvider for FixtureProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn history<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, OhlcvTable> {
        Box::pin(async move { self.build_history(req) })
    }

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, FundamentalsRecord> {
        Box::pin(async move { self.build_fundamentals(symbol) })
    }
}

fn rows_in(span: Duration, step: Duration) -> usize {
    let steps = span.whole_seconds() / step.whole_seconds().max(1);
    (steps.max(1) as usize).min(MAX_ROWS)
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn price_scale(symbol: &Symbol) -> f64 {
    if symbol.is_index() {
        200.0
    } else if symbol.as_str().starts_with("BTC") {
        600.0
    } else if symbol.has_suffix(".NS") || symbol.has_suffix(".BO") {
        25.0
    } else {
        1.0
    }
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}
