//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// These are what the CLI reports at its single catch-all boundary; the
/// conversion pipeline keeps its own, more detailed error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The input file is missing or unreadable.
    #[error("Input unavailable: {0}")]
    InputUnavailable(String),

    /// The input was read but could not be converted.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The return could not be written.
    #[error("Output error: {0}")]
    Output(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 78,
            Self::InputUnavailable(_) => 66,
            Self::Conversion(_) => 65,
            Self::Output(_) => 73,
            Self::Internal(_) => 70,
        }
    }

    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InputUnavailable(_) => "INPUT_UNAVAILABLE",
            Self::Conversion(_) => "CONVERSION_ERROR",
            Self::Output(_) => "OUTPUT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
