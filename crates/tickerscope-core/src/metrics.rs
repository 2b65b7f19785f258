//! Display formatting for fundamentals.

use serde::Serialize;

use crate::FundamentalsRecord;

pub const NOT_AVAILABLE: &str = "N/A";

/// How a single metric value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// `$123.45`
    Price,
    /// `12.34%`
    Percentage,
    /// `12.34`
    Ratio,
    /// Plain number.
    Number,
}

/// `$1.23T`, `$4.56B`, `$7.89M`, or `$12,345.67` below a million.
pub fn format_large_number(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("${}", compact(v)),
        None => NOT_AVAILABLE.to_owned(),
    }
}

/// Share counts in the same compact form, without a currency sign.
pub fn format_count(value: Option<u64>) -> String {
    match value {
        Some(v) if v < 1_000_000 => with_thousands(v as f64)
            .trim_end_matches(".00")
            .to_owned(),
        Some(v) => compact(v as f64),
        None => NOT_AVAILABLE.to_owned(),
    }
}

pub fn format_metric_value(value: Option<f64>, kind: MetricKind) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return NOT_AVAILABLE.to_owned();
    };
    match kind {
        MetricKind::Price => format!("${v:.2}"),
        MetricKind::Percentage => format!("{v:.2}%"),
        MetricKind::Ratio => format!("{v:.2}"),
        MetricKind::Number => v.to_string(),
    }
}

fn compact(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if magnitude >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else {
        with_thousands(v)
    }
}

fn with_thousands(v: f64) -> String {
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Key metrics row for one symbol, ready for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMetrics {
    pub symbol: String,
    pub current_price: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub volume: String,
    pub avg_volume: String,
    pub dividend_yield: String,
    pub beta: String,
}

impl KeyMetrics {
    /// `dividend_yield` arrives as a fraction and is shown as a percentage.
    pub fn from_record(symbol: impl Into<String>, record: &FundamentalsRecord) -> Self {
        Self {
            symbol: symbol.into(),
            current_price: format_metric_value(record.current_price, MetricKind::Price),
            market_cap: format_large_number(record.market_cap),
            pe_ratio: format_metric_value(record.trailing_pe, MetricKind::Ratio),
            volume: format_count(record.volume),
            avg_volume: format_count(record.average_volume),
            dividend_yield: format_metric_value(
                record.dividend_yield.map(|y| y * 100.0),
                MetricKind::Percentage,
            ),
            beta: format_metric_value(record.beta, MetricKind::Ratio),
        }
    }

    /// (label, value) pairs in display order.
    pub fn rows(&self) -> [(&'static str, &str); 7] {
        [
            ("Current Price", self.current_price.as_str()),
            ("Market Cap", self.market_cap.as_str()),
            ("P/E Ratio", self.pe_ratio.as_str()),
            ("Volume", self.volume.as_str()),
            ("Avg Volume", self.avg_volume.as_str()),
            ("Dividend Yield", self.dividend_yield.as_str()),
            ("Beta", self.beta.as_str()),
        ]
    }
}
