//! CLI argument definitions for tickerscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resolve` | Resolve raw tickers to provider symbols |
//! | `history` | Fetch historical OHLCV rows, optionally with indicators |
//! | `fundamentals` | Fetch fundamentals snapshots |
//! | `metrics` | Fetch display-ready key metrics |
//! | `price` | Fetch the current price |
//! | `search` | Search the offline symbol catalog |
//! | `status` | Show which markets are trading now |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--source` | `yahoo` | Market-data provider |
//! | `--market` | `global` | Market the raw tickers belong to |
//! | `--timeout-ms` | env or `10000` | Request timeout in ms |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! tickerscope resolve IRCTC M&M --market indian
//! tickerscope history RELIANCE TCS --market indian --period 3mo --indicators
//! tickerscope history AAPL --start 2024-01-01 --end 2024-02-01 --interval 1h
//! tickerscope metrics BTC --market crypto --format table
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerscope_core::{MarketType, ProviderId};

/// Resolve tickers across markets and fetch their price history and fundamentals.
#[derive(Debug, Parser)]
#[command(
    name = "tickerscope",
    author,
    version,
    about = "Multi-market ticker resolution and market data CLI"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Market-data provider.
    ///
    /// - yahoo: Yahoo Finance over HTTPS
    /// - fixture: deterministic offline data
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Yahoo)]
    pub source: SourceSelector,

    /// Market the raw tickers belong to; drives suffix resolution.
    #[arg(long, global = true, value_enum, default_value_t = MarketArg::Global)]
    pub market: MarketArg,

    /// Request timeout in milliseconds. Overrides TICKERSCOPE_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log resolution and provider calls at debug level on stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

/// Provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Yahoo Finance.
    Yahoo,
    /// Deterministic offline fixture data.
    Fixture,
}

impl From<SourceSelector> for ProviderId {
    fn from(value: SourceSelector) -> Self {
        match value {
            SourceSelector::Yahoo => Self::Yahoo,
            SourceSelector::Fixture => Self::Fixture,
        }
    }
}

/// Market selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarketArg {
    /// Global equities; tickers pass through unchanged.
    Global,
    /// Indian equities on NSE/BSE.
    Indian,
    /// Crypto pairs quoted in USD.
    Crypto,
    /// Commodity futures.
    Commodity,
}

impl From<MarketArg> for MarketType {
    fn from(value: MarketArg) -> Self {
        match value {
            MarketArg::Global => Self::Global,
            MarketArg::Indian => Self::Indian,
            MarketArg::Crypto => Self::Crypto,
            MarketArg::Commodity => Self::Commodity,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve raw tickers to the symbols the provider understands.
    ///
    /// # Examples
    ///
    ///   tickerscope resolve TCS IRCTC --market indian
    ///   tickerscope resolve BTC --market crypto
    Resolve(SymbolsArgs),

    /// Fetch historical OHLCV rows.
    ///
    /// Use either --period or --start/--end. Without either, the last
    /// month is fetched.
    ///
    /// # Examples
    ///
    ///   tickerscope history RELIANCE --market indian
    ///   tickerscope history AAPL MSFT --period 6mo --interval 1d
    ///   tickerscope history GC --market commodity --start 2024-01-01 --end 2024-03-01
    History(HistoryArgs),

    /// Fetch fundamentals snapshots.
    Fundamentals(SymbolsArgs),

    /// Fetch display-ready key metrics (price, market cap, P/E, ...).
    Metrics(SymbolsArgs),

    /// Fetch the current price.
    Price(SymbolsArgs),

    /// Search the offline symbol catalog of the selected market.
    Search(SearchArgs),

    /// Show which markets are trading right now.
    Status,
}

/// Arguments for commands taking one or more raw tickers.
#[derive(Debug, Args)]
pub struct SymbolsArgs {
    /// One or more raw tickers (e.g., AAPL, RELIANCE, BTC).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `history` command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// One or more raw tickers.
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Preset lookback: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, max.
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub period: Option<String>,

    /// Range start date (YYYY-MM-DD), inclusive.
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Range end date (YYYY-MM-DD), exclusive.
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Sampling interval: 1m, 5m, 15m, 30m, 1h, 1d.
    #[arg(long, default_value = "1d")]
    pub interval: String,

    /// Add RSI, MACD and Bollinger bands to each series.
    #[arg(long, default_value_t = false)]
    pub indicators: bool,
}

/// Arguments for the `search` command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Ticker fragment or company name.
    pub query: String,
}
