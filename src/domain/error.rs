//! Domain error types.

/// Failure of a pure indicator computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("average loss is zero at index {index}, RSI is undefined")]
    DivisionByZero { index: usize },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },
}

impl IndicatorError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        IndicatorError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for stockcharts.
#[derive(Debug, thiserror::Error)]
pub enum ChartsError {
    #[error("data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ChartsError> for std::process::ExitCode {
    fn from(err: &ChartsError) -> Self {
        let code: u8 = match err {
            ChartsError::Io(_) | ChartsError::Render { .. } => 1,
            ChartsError::ConfigParse { .. }
            | ChartsError::ConfigMissing { .. }
            | ChartsError::ConfigInvalid { .. } => 2,
            ChartsError::DataUnavailable { .. } => 3,
            ChartsError::Indicator(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_error_messages() {
        let err = IndicatorError::invalid_parameter("window", "must be positive");
        assert_eq!(err.to_string(), "invalid parameter window: must be positive");

        let err = IndicatorError::LengthMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "length mismatch: expected 3, got 2");
    }

    #[test]
    fn indicator_error_is_transparent() {
        let err: ChartsError = IndicatorError::DivisionByZero { index: 14 }.into();
        assert_eq!(
            err.to_string(),
            "average loss is zero at index 14, RSI is undefined"
        );
    }

    #[test]
    fn data_unavailable_message_names_symbol() {
        let err = ChartsError::DataUnavailable {
            symbol: "AAPL".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "data unavailable for AAPL: connection refused"
        );
    }
}
