use serde::{Deserialize, Serialize};

use crate::{Interval, Symbol, UtcDateTime, ValidationError};

/// One OHLCV row of a history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_positive("open", open)?;
        validate_positive("high", high)?;
        validate_positive("low", low)?;
        validate_positive("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Time-ordered OHLCV rows for one symbol.
///
/// An empty table is a valid value meaning "the provider had no rows"; it is
/// never used to stand in for a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvTable {
    pub symbol: Symbol,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

impl OhlcvTable {
    pub fn new(symbol: Symbol, interval: Interval, bars: Vec<Bar>) -> Self {
        Self {
            symbol,
            interval,
            bars,
        }
    }

    pub fn empty(symbol: Symbol, interval: Interval) -> Self {
        Self::new(symbol, interval, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

/// Snapshot fundamentals for one symbol. Any field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsRecord {
    pub symbol: Option<Symbol>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub volume: Option<u64>,
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub average_volume: Option<u64>,
}

impl FundamentalsRecord {
    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol: Some(symbol),
            ..Self::default()
        }
    }

    /// Drop non-finite values so downstream formatting only sees real numbers.
    pub fn sanitized(mut self) -> Self {
        for field in [
            &mut self.current_price,
            &mut self.market_cap,
            &mut self.trailing_pe,
            &mut self.beta,
            &mut self.dividend_yield,
        ] {
            *field = field.filter(|value| value.is_finite());
        }
        self
    }

    pub fn recognized_field_count(&self) -> usize {
        [
            self.current_price.is_some(),
            self.market_cap.is_some(),
            self.trailing_pe.is_some(),
            self.volume.is_some(),
            self.beta.is_some(),
            self.dividend_yield.is_some(),
            self.average_volume.is_some(),
        ]
        .into_iter()
        .filter(|known| *known)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.recognized_field_count() == 0
    }
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
