use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickerscope_core::ValidationError),

    #[error(transparent)]
    Indicator(#[from] tickerscope_core::IndicatorError),

    #[error("provider setup failed: {0}")]
    Provider(#[from] tickerscope_core::SourceError),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Indicator(_) | Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Provider(_) => 6,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_usage_errors() {
        let error = CliError::from(tickerscope_core::ValidationError::EmptySymbol);
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn strict_mode_has_its_own_code() {
        let error = CliError::StrictModeViolation {
            warning_count: 1,
            error_count: 0,
        };
        assert_eq!(error.exit_code(), 5);
    }
}
