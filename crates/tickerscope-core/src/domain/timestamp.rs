use std::fmt::{Display, Formatter};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Instant on the UTC timeline. Serialized as RFC3339 with a `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Midnight UTC at the start of `date`; range windows are cut here.
    pub fn start_of_day(date: Date) -> Self {
        Self(date.midnight().assume_utc())
    }

    /// Parse RFC3339 text. Only `Z` or `+00:00` offsets are accepted, so a
    /// stored row never silently changes its wall-clock reading.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let not_utc = || ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        };
        let parsed = OffsetDateTime::parse(input.trim(), &Rfc3339).map_err(|_| not_utc())?;
        if parsed.offset() != UtcOffset::UTC {
            return Err(not_utc());
        }
        Ok(Self(parsed))
    }

    /// Seconds since the Unix epoch, as chart payloads deliver them.
    pub fn from_unix_timestamp(seconds: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(seconds)
            .map(Self)
            .map_err(|_| ValidationError::TimestampNotUtc {
                value: seconds.to_string(),
            })
    }

    pub fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    pub fn format_rfc3339(self) -> String {
        // Only years outside 0..=9999 fail to format.
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl From<OffsetDateTime> for UtcDateTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    #[test]
    fn chart_seconds_round_trip_through_text() {
        let ts = UtcDateTime::from_unix_timestamp(1_704_067_200).expect("valid");
        assert_eq!(ts.to_string(), "2024-01-01T00:00:00Z");
        assert_eq!(UtcDateTime::parse("2024-01-01T00:00:00Z"), Ok(ts));
    }

    #[test]
    fn offset_text_is_rejected() {
        let err = UtcDateTime::parse("2024-01-01T05:30:00+05:30").expect_err("IST offset");
        assert!(matches!(err, ValidationError::TimestampNotUtc { .. }));
    }

    #[test]
    fn offset_instants_are_normalized() {
        let ist = datetime!(2024-01-01 09:15 +05:30);
        assert_eq!(UtcDateTime::from(ist).to_string(), "2024-01-01T03:45:00Z");
    }

    #[test]
    fn day_start_is_utc_midnight() {
        assert_eq!(
            UtcDateTime::start_of_day(date!(2024 - 01 - 04)).unix_timestamp(),
            1_704_326_400
        );
    }
}
