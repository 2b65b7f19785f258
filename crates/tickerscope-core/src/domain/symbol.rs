use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 20;

/// NSE listing suffix.
pub const NSE_SUFFIX: &str = ".NS";
/// BSE listing suffix.
pub const BSE_SUFFIX: &str = ".BO";
/// Crypto pair quote suffix.
pub const CRYPTO_SUFFIX: &str = "-USD";
/// Commodity futures suffix.
pub const COMMODITY_SUFFIX: &str = "=F";
/// Index prefix.
pub const INDEX_PREFIX: char = '^';

/// Normalized market symbol/ticker as understood by the data provider.
///
/// Exchange and asset class travel inside the string by suffix convention:
/// `.NS`/`.BO` for Indian listings, `-USD` for crypto pairs, `=F` for
/// commodity futures and a leading `^` for indices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        // Exchange and asset decorations do not count towards the limit, so a
        // bare ticker stays valid once the resolver suffixes it.
        let len = undecorated(&normalized).chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '=' | '^' | '&');
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
            if ch == INDEX_PREFIX && index != 0 {
                return Err(ValidationError::SymbolMalformed {
                    value: normalized.clone(),
                    reason: "'^' is only allowed as an index prefix",
                });
            }
        }

        if normalized.len() == 1 && normalized.starts_with(INDEX_PREFIX) {
            return Err(ValidationError::SymbolMalformed {
                value: normalized,
                reason: "index prefix must be followed by a name",
            });
        }

        if let Some(position) = normalized.find('=') {
            if position == 0 || position + 2 != normalized.len() {
                return Err(ValidationError::SymbolMalformed {
                    value: normalized,
                    reason: "'=' must introduce a single-letter contract suffix",
                });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_index(&self) -> bool {
        self.0.starts_with(INDEX_PREFIX)
    }

    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }

    /// Swap an existing `from` suffix for `to`. Returns `None` when the
    /// symbol does not carry `from`.
    pub fn with_replaced_suffix(&self, from: &str, to: &str) -> Option<Self> {
        let base = self.0.strip_suffix(from)?;
        Some(Self(format!("{base}{to}")))
    }

    /// Symbol with any exchange or asset decoration removed.
    pub fn base(&self) -> &str {
        undecorated(&self.0)
    }
}

fn undecorated(symbol: &str) -> &str {
    let trimmed = symbol.trim_start_matches(INDEX_PREFIX);
    [NSE_SUFFIX, BSE_SUFFIX, CRYPTO_SUFFIX, COMMODITY_SUFFIX]
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .unwrap_or(trimmed)
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
