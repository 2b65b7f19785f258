//! Core contracts for tickerscope.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The market-data provider contract with Yahoo and fixture adapters
//! - The probe helper, rule-list symbol resolver and fallback fetcher
//! - Symbol catalog, market hours, indicators and metric formatting
//! - Response envelope and structured errors

pub mod adapters;
pub mod catalog;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod indicators;
pub mod market_hours;
pub mod metrics;
pub mod probe;
pub mod resolver;
pub mod source;

pub use adapters::{FixtureProvider, YahooAdapter, YahooAuthManager};
pub use catalog::{is_indian_stock, search_symbols, SymbolSuggestion, MAX_SUGGESTIONS};
pub use config::ProviderConfig;
pub use data_source::{
    HistoryRequest, MarketDataProvider, ProviderFuture, SourceError, SourceErrorKind,
};
pub use domain::{
    parse_date, Bar, FundamentalsRecord, Interval, MarketType, OhlcvTable, Period, Symbol,
    UtcDateTime, WindowSpec, BSE_SUFFIX, COMMODITY_SUFFIX, CRYPTO_SUFFIX, INDEX_PREFIX,
    NSE_SUFFIX,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{FetchError, ValidationError};
pub use fetcher::{BatchEntry, MarketDataService};
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use indicators::{IndicatorError, IndicatorRow};
pub use market_hours::is_market_open;
pub use metrics::{format_large_number, format_metric_value, KeyMetrics, MetricKind};
pub use probe::probe;
pub use resolver::{Exhaustion, Resolution, ResolutionRule, Selection, SymbolResolver};
pub use source::ProviderId;
