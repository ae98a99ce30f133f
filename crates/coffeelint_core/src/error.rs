//! Linter error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while driving the external linter.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Settings error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The linter process could not be started.
    #[error("Failed to launch '{command}': {source}")]
    ProcessLaunch {
        /// Command line that was attempted.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The linter process exceeded its time budget and was killed.
    #[error("Command '{command}' is timed out after {}ms.", .timeout.as_millis())]
    Timeout {
        /// Command line that was killed.
        command: String,
        /// Budget that was exceeded.
        timeout: Duration,
    },

    /// The linter's stdout was not a checkstyle report.
    #[error("Malformed checkstyle report: {0}")]
    MalformedReport(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a malformed report error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReport(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns `true` if this error came from the process time budget.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_command() {
        let err = LinterError::Timeout {
            command: "node coffeelint a.coffee".to_string(),
            timeout: Duration::from_millis(1500),
        };
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Command 'node coffeelint a.coffee' is timed out after 1500ms."
        );
    }

    #[test]
    fn test_launch_error_is_not_timeout() {
        let err = LinterError::ProcessLaunch {
            command: "missing".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("Failed to launch 'missing'"));
    }
}
