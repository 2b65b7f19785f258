use serde::{Deserialize, Serialize};

use crate::{FetchError, ProviderId, UtcDateTime, ValidationError};

pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Standard response envelope for all `tickerscope` machine-readable outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        for error in &errors {
            error.validate()?;
        }

        Ok(Self { meta, data, errors })
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    pub provider: ProviderId,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        provider: ProviderId,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: String::from(SCHEMA_VERSION),
            generated_at: UtcDateTime::now(),
            provider,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }

        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        Ok(())
    }
}

/// Structured error payload for partial or failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl EnvelopeError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let error = Self {
            code: code.into(),
            message: message.into(),
            symbol: None,
            retryable: None,
        };
        error.validate()?;
        Ok(error)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }

        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }

        Ok(())
    }
}

impl From<&FetchError> for EnvelopeError {
    fn from(error: &FetchError) -> Self {
        let envelope_error = Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            symbol: None,
            retryable: None,
        }
        .with_symbol(error.symbol());

        match error {
            FetchError::Provider { source, .. } => {
                envelope_error.with_retryable(source.retryable())
            }
            FetchError::NoData { .. } | FetchError::Validation { .. } => envelope_error,
        }
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let parts = version.split('.').collect::<Vec<_>>();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceError;

    #[test]
    fn rejects_short_request_id() {
        let err = EnvelopeMeta::new("short", ProviderId::Fixture, 0).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidRequestId));
    }

    #[test]
    fn rejects_malformed_schema_version() {
        let mut meta =
            EnvelopeMeta::new("req-12345678", ProviderId::Yahoo, 12).expect("valid meta");
        meta.schema_version = String::from("1.0");
        assert!(matches!(
            meta.validate(),
            Err(ValidationError::InvalidSchemaVersion { .. })
        ));
    }

    #[test]
    fn fetch_errors_carry_symbol_and_retry_hint() {
        let error = FetchError::Provider {
            symbol: String::from("AAPL"),
            source: SourceError::rate_limited("slow down"),
        };
        let envelope_error = EnvelopeError::from(&error);

        assert_eq!(envelope_error.code, "fetch.provider");
        assert_eq!(envelope_error.symbol.as_deref(), Some("AAPL"));
        assert_eq!(envelope_error.retryable, Some(true));
    }

    #[test]
    fn empty_errors_are_omitted_from_json() {
        let meta = EnvelopeMeta::new("req-12345678", ProviderId::Fixture, 3).expect("valid meta");
        let json = serde_json::to_value(Envelope::success(meta, 1)).expect("serializable");
        assert!(json.get("errors").is_none());
        assert_eq!(json["meta"]["provider"], "fixture");
    }
}
