use thiserror::Error;

use crate::data_source::SourceError;

/// Validation and contract errors exposed by `tickerscope-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("symbol '{value}' is malformed: {reason}")]
    SymbolMalformed { value: String, reason: &'static str },

    #[error("invalid market type '{value}', expected one of global, indian, crypto, commodity")]
    InvalidMarketType { value: String },
    #[error("invalid interval '{value}', expected one of 1m, 5m, 15m, 30m, 1h, 1d")]
    InvalidInterval { value: String },
    #[error("invalid period '{value}', expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, max")]
    InvalidPeriod { value: String },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: String, end: String },
    #[error("window must use either a preset period or an explicit start/end range, not both")]
    AmbiguousWindow,
    #[error("window requires a preset period or an explicit start/end range")]
    MissingWindow,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failure of a history or fundamentals fetch.
///
/// Every variant keeps the symbol exactly as the caller typed it, so a batch
/// caller can report which entry failed and why.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("no data found for {symbol}: {detail}")]
    NoData { symbol: String, detail: String },

    #[error("error fetching data for {symbol}: {source}")]
    Provider {
        symbol: String,
        #[source]
        source: SourceError,
    },

    #[error("invalid request for '{symbol}': {source}")]
    Validation {
        symbol: String,
        #[source]
        source: ValidationError,
    },
}

impl FetchError {
    pub fn symbol(&self) -> &str {
        match self {
            Self::NoData { symbol, .. }
            | Self::Provider { symbol, .. }
            | Self::Validation { symbol, .. } => symbol,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoData { .. } => "fetch.no_data",
            Self::Provider { .. } => "fetch.provider",
            Self::Validation { .. } => "fetch.invalid_request",
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
