use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration};

use super::Interval;
use crate::ValidationError;

/// Named lookback preset resolved by the provider relative to request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Self; 9] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::Max,
    ];

    /// The cheapest preset the provider accepts; used for symbol probes.
    pub const fn shortest() -> Self {
        Self::OneDay
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::Max => "max",
        }
    }

    /// Approximate calendar span; `None` for `max`.
    pub fn approx_span(self) -> Option<Duration> {
        let days = match self {
            Self::OneDay => 1,
            Self::FiveDays => 5,
            Self::OneMonth => 30,
            Self::ThreeMonths => 91,
            Self::SixMonths => 182,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1_826,
            Self::Max => return None,
        };
        Some(Duration::days(days))
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == normalized)
            .ok_or(ValidationError::InvalidPeriod { value: normalized })
    }
}

/// Time window of a history request.
///
/// Exactly one form is active: a preset lookback or an explicit date range.
/// The range end is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSpec {
    Preset {
        period: Period,
        interval: Interval,
    },
    Range {
        start: Date,
        end: Date,
        interval: Interval,
    },
}

impl WindowSpec {
    pub const fn preset(period: Period, interval: Interval) -> Self {
        Self::Preset { period, interval }
    }

    pub fn range(start: Date, end: Date, interval: Interval) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self::Range {
            start,
            end,
            interval,
        })
    }

    /// Build a window from the loose parts a form submits.
    ///
    /// Exactly one of `period` or the `start`/`end` pair must be present.
    pub fn from_parts(
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        interval: &str,
    ) -> Result<Self, ValidationError> {
        let interval = Interval::from_str(interval)?;
        match (period, start, end) {
            (Some(period), None, None) => Ok(Self::preset(Period::from_str(period)?, interval)),
            (None, Some(start), Some(end)) => {
                Self::range(parse_date(start)?, parse_date(end)?, interval)
            }
            (None, _, _) => Err(ValidationError::MissingWindow),
            (Some(_), _, _) => Err(ValidationError::AmbiguousWindow),
        }
    }

    pub const fn interval(&self) -> Interval {
        match self {
            Self::Preset { interval, .. } | Self::Range { interval, .. } => *interval,
        }
    }

    /// Minimal window used to test whether the provider knows a symbol.
    pub const fn probe() -> Self {
        Self::preset(Period::shortest(), Interval::OneDay)
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::preset(Period::OneMonth, Interval::OneDay)
    }
}

impl Display for WindowSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preset { period, interval } => write!(f, "period={period} interval={interval}"),
            Self::Range {
                start,
                end,
                interval,
            } => write!(f, "start={start} end={end} interval={interval}"),
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}
