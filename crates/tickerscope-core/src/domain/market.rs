use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::symbol::{BSE_SUFFIX, COMMODITY_SUFFIX, CRYPTO_SUFFIX, NSE_SUFFIX};
use crate::ValidationError;

/// Market classification selected by the caller.
///
/// Determines which suffix convention and which fallback sequence the
/// resolver applies to a raw ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    Global,
    Indian,
    Crypto,
    Commodity,
}

impl MarketType {
    pub const ALL: [Self; 4] = [Self::Global, Self::Indian, Self::Crypto, Self::Commodity];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Indian => "indian",
            Self::Crypto => "crypto",
            Self::Commodity => "commodity",
        }
    }

    /// Human-readable label used by the dashboard selector.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Global => "Global Stocks",
            Self::Indian => "Indian Stocks (NSE/BSE)",
            Self::Crypto => "Cryptocurrency",
            Self::Commodity => "Commodities",
        }
    }

    /// Suffixes that mark a symbol as already canonical for this market.
    pub const fn recognized_suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Global => &[],
            Self::Indian => &[NSE_SUFFIX, BSE_SUFFIX],
            Self::Crypto => &[CRYPTO_SUFFIX],
            Self::Commodity => &[COMMODITY_SUFFIX],
        }
    }

    pub fn has_recognized_suffix(self, symbol: &str) -> bool {
        self.recognized_suffixes()
            .iter()
            .any(|suffix| symbol.ends_with(suffix))
    }
}

impl Display for MarketType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "global" | "global stocks" => Ok(Self::Global),
            "indian" | "india" | "indian stocks (nse/bse)" | "indian (nse/bse)" => {
                Ok(Self::Indian)
            }
            "crypto" | "cryptocurrency" => Ok(Self::Crypto),
            "commodity" | "commodities" => Ok(Self::Commodity),
            _ => Err(ValidationError::InvalidMarketType {
                value: value.trim().to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_names_and_dashboard_labels() {
        for market in MarketType::ALL {
            assert_eq!(MarketType::from_str(market.as_str()), Ok(market));
            assert_eq!(MarketType::from_str(market.label()), Ok(market));
        }
    }

    #[test]
    fn rejects_unknown_market() {
        let err = MarketType::from_str("forex").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidMarketType { .. }));
    }

    #[test]
    fn suffix_detection_is_case_sensitive() {
        assert!(MarketType::Indian.has_recognized_suffix("TCS.NS"));
        assert!(!MarketType::Indian.has_recognized_suffix("TCS.ns"));
        assert!(!MarketType::Global.has_recognized_suffix("TCS.NS"));
    }
}
