//! Error types for askchart.
//!
//! Defines the main error enum used throughout the pipeline.

use thiserror::Error;

/// Main error type for askchart operations.
///
/// Only `Generation` errors are allowed to escape `Pipeline::run`; the other
/// pipeline failures are recovered into degenerate output (see the stage
/// modules).
#[derive(Error, Debug)]
pub enum AskChartError {
    /// LLM call failed or the provider is unreachable (rate limits, auth, timeouts, etc.)
    #[error("Generation error: {0}")]
    Generation(String),

    /// SQL execution errors (malformed SQL, missing table, type errors, etc.)
    #[error("Execution error: {0}")]
    Execution(String),

    /// Chart-config response could not be parsed as JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Forecast model could not be fitted (short series, singular system, etc.)
    #[error("Forecast error: {0}")]
    Forecast(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AskChartError {
    /// Creates a generation error with the given message.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a forecast error with the given message.
    pub fn forecast(msg: impl Into<String>) -> Self {
        Self::Forecast(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for the error envelope.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Generation(_) => "Generation Error",
            Self::Execution(_) => "Execution Error",
            Self::Parse(_) => "Parse Error",
            Self::Forecast(_) => "Forecast Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using AskChartError.
pub type Result<T> = std::result::Result<T, AskChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_generation() {
        let err = AskChartError::generation("Rate limited. Please wait.");
        assert_eq!(
            err.to_string(),
            "Generation error: Rate limited. Please wait."
        );
        assert_eq!(err.category(), "Generation Error");
    }

    #[test]
    fn test_error_display_execution() {
        let err = AskChartError::execution("no such table: Orderz");
        assert_eq!(err.to_string(), "Execution error: no such table: Orderz");
        assert_eq!(err.category(), "Execution Error");
    }

    #[test]
    fn test_error_display_parse() {
        let err = AskChartError::parse("no JSON object in response");
        assert_eq!(err.to_string(), "Parse error: no JSON object in response");
        assert_eq!(err.category(), "Parse Error");
    }

    #[test]
    fn test_error_display_forecast() {
        let err = AskChartError::forecast("series too short");
        assert_eq!(err.to_string(), "Forecast error: series too short");
        assert_eq!(err.category(), "Forecast Error");
    }

    #[test]
    fn test_error_display_config() {
        let err = AskChartError::config("missing field 'path' in [database]");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing field 'path' in [database]"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AskChartError>();
    }
}
