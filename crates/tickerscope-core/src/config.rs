//! Provider configuration.
//!
//! Defaults are suitable for the public Yahoo Finance endpoints. Each field
//! can be overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `TICKERSCOPE_TIMEOUT_MS` | [`ProviderConfig::timeout_ms`] |
//! | `TICKERSCOPE_USER_AGENT` | [`ProviderConfig::user_agent`] |
//! | `TICKERSCOPE_YAHOO_BASE_URL` | [`ProviderConfig::yahoo_base_url`] |
//! | `YAHOO_COOKIE` | [`ProviderConfig::cookie_override`] |

use std::env;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_USER_AGENT: &str = concat!("tickerscope/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Settings shared by the HTTP transport and the Yahoo adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub yahoo_base_url: String,
    /// Pre-baked session cookie; skips the cookie/crumb handshake when set.
    pub cookie_override: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: String::from(DEFAULT_USER_AGENT),
            yahoo_base_url: String::from(DEFAULT_YAHOO_BASE_URL),
            cookie_override: None,
        }
    }
}

impl ProviderConfig {
    /// Defaults overlaid with any environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ProviderConfig::from_env`] but reading from an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            timeout_ms: non_empty("TICKERSCOPE_TIMEOUT_MS")
                .and_then(|value| value.trim().parse().ok())
                .filter(|timeout: &u64| *timeout > 0)
                .unwrap_or(defaults.timeout_ms),
            user_agent: non_empty("TICKERSCOPE_USER_AGENT").unwrap_or(defaults.user_agent),
            yahoo_base_url: non_empty("TICKERSCOPE_YAHOO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.yahoo_base_url),
            cookie_override: non_empty("YAHOO_COOKIE"),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
