//! # Domain Models
//!
//! Canonical domain types for tickerscope market data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Provider-ready ticker carrying its exchange suffix |
//! | [`MarketType`] | Caller-selected market classification |
//! | [`Interval`] | Sampling granularity (1m .. 1d) |
//! | [`Period`] | Named lookback preset (1d .. max) |
//! | [`WindowSpec`] | Preset period or explicit date range |
//! | [`Bar`] | One OHLCV row |
//! | [`OhlcvTable`] | Time-ordered rows for a symbol |
//! | [`FundamentalsRecord`] | Snapshot fundamentals with optional fields |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! All types validate their invariants at construction time:
//!
//! ```rust
//! use tickerscope_core::{Bar, UtcDateTime, ValidationError};
//!
//! let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap();
//! assert!(Bar::new(ts, 100.0, 105.0, 95.0, 102.0, 1_000).is_ok());
//!
//! let invalid = Bar::new(ts, 100.0, 95.0, 105.0, 102.0, 1_000);
//! assert!(matches!(invalid, Err(ValidationError::InvalidBarRange)));
//! ```

mod interval;
mod market;
mod models;
mod symbol;
mod timestamp;
mod window;

pub use interval::Interval;
pub use market::MarketType;
pub use models::{Bar, FundamentalsRecord, OhlcvTable};
pub use symbol::{
    Symbol, BSE_SUFFIX, COMMODITY_SUFFIX, CRYPTO_SUFFIX, INDEX_PREFIX, NSE_SUFFIX,
};
pub use timestamp::UtcDateTime;
pub use window::{parse_date, Period, WindowSpec};
