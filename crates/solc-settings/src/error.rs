//! Settings error types

/// Errors raised while validating or importing a settings block
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// `optimizerRuns` was set to zero
    #[error("optimizerRuns must be a positive integer, got {0}")]
    NonPositiveRuns(u64),

    /// `optimizerRuns` does not fit the supported range
    #[error("optimizerRuns {0} is out of range")]
    RunsOutOfRange(u64),

    /// A recognized key carried a value of the wrong type
    #[error("setting '{key}' must be {expected}")]
    InvalidValue { key: String, expected: &'static str },

    /// The settings document was not a key/value object
    #[error("settings must be an object, got {0}")]
    NotAnObject(&'static str),
}
