//! Domain error types.

/// A strategy parameter set violates a variant-specific constraint.
///
/// Raised once, when a [`StrategyEngine`](crate::domain::backtest::StrategyEngine)
/// is constructed. `field` names the offending parameter and `rule` states the
/// constraint that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid strategy config: {field} {rule}")]
pub struct ConfigValidationError {
    pub field: String,
    pub rule: String,
}

impl ConfigValidationError {
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
        }
    }
}

/// Top-level error type for signalbench.
#[derive(Debug, thiserror::Error)]
pub enum SignalbenchError {
    #[error(transparent)]
    ConfigValidation(#[from] ConfigValidationError),

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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid series: {reason}")]
    InvalidSeries { reason: String },

    #[error("execution failed at bar {bar_index}: {reason}")]
    Execution { bar_index: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignalbenchError> for std::process::ExitCode {
    fn from(err: &SignalbenchError) -> Self {
        let code: u8 = match err {
            SignalbenchError::Io(_) => 1,
            SignalbenchError::ConfigValidation(_)
            | SignalbenchError::ConfigParse { .. }
            | SignalbenchError::ConfigMissing { .. }
            | SignalbenchError::ConfigInvalid { .. } => 2,
            SignalbenchError::Data { .. } => 3,
            SignalbenchError::InvalidSeries { .. } => 4,
            SignalbenchError::Execution { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
