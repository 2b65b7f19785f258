//! Provider contract and request/response types.
//!
//! The core talks to a market-data provider through exactly two opaque calls:
//!
//! | Call | Request | Response |
//! |------|---------|----------|
//! | History | [`HistoryRequest`] | [`OhlcvTable`] |
//! | Fundamentals | [`Symbol`] | [`FundamentalsRecord`] |
//!
//! Implementations return an empty table or record when the provider has no
//! rows; [`SourceErrorKind::NotFound`] is reserved for a provider that
//! explicitly rejects the symbol. Every other error kind is a failed call.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{FundamentalsRecord, OhlcvTable, ProviderId, Symbol, WindowSpec};

/// Boxed future returned by provider calls.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    NotFound,
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    /// True when the provider reported that it has nothing for the symbol.
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, SourceErrorKind::NotFound)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for history calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub window: WindowSpec,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, window: WindowSpec) -> Self {
        Self { symbol, window }
    }

    /// Minimal request used to check that a symbol exists.
    pub fn probe(symbol: Symbol) -> Self {
        Self::new(symbol, WindowSpec::probe())
    }
}

/// Market-data provider contract.
///
/// Implementations must be `Send + Sync`; the core shares one provider across
/// independent calls and never holds state between them.
pub trait MarketDataProvider: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches a historical OHLCV table for the requested window.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider rejects the symbol
    /// ([`SourceErrorKind::NotFound`]) or the call itself fails.
    fn history<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, OhlcvTable>;

    /// Fetches the current fundamentals snapshot.
    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, FundamentalsRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_follow_kind() {
        assert_eq!(SourceError::not_found("x").code(), "source.not_found");
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert!(SourceError::rate_limited("slow down").retryable());
        assert!(!SourceError::internal("bad json").retryable());
    }

    #[test]
    fn display_includes_message_and_code() {
        let error = SourceError::unavailable("connection reset");
        assert_eq!(error.to_string(), "connection reset (source.unavailable)");
    }
}
