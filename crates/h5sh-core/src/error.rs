//! Error types for console and history operations.

use std::io;
use thiserror::Error;

/// Console operation errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Raw mode could not be engaged. The prior mode has already been restored.
    #[error("Unable to switch terminal to raw mode: {0}")]
    ModeSwitch(#[source] io::Error),

    /// The captured terminal mode could not be written back.
    #[error("Failed to restore terminal mode: {0}")]
    ModeRestore(#[source] io::Error),

    /// The raw mode guard was already released.
    #[error("Terminal mode already restored")]
    AlreadyRestored,

    /// Platform-specific I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Feature not supported on this platform
    #[error("Feature '{feature}' not supported on platform '{platform}'")]
    UnsupportedFeature { feature: String, platform: String },
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Attempt to walk past either end of the history.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Tried to go beyond start of history")]
    AtStart,
    #[error("Tried to go beyond end of history")]
    AtEnd,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_mode_switch_keeps_source() {
        let err = ConsoleError::ModeSwitch(io::Error::new(io::ErrorKind::Other, "not a tty"));
        assert_eq!(
            err.to_string(),
            "Unable to switch terminal to raw mode: not a tty"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ConsoleError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, ConsoleError::IoError(_)));
        assert_eq!(err.to_string(), "I/O error: gone");
    }

    #[test]
    fn test_history_error_display() {
        assert_eq!(
            HistoryError::AtStart.to_string(),
            "Tried to go beyond start of history"
        );
        assert_eq!(
            HistoryError::AtEnd.to_string(),
            "Tried to go beyond end of history"
        );
    }

    #[test]
    fn test_unsupported_feature_display() {
        let err = ConsoleError::UnsupportedFeature {
            feature: "raw mode".to_string(),
            platform: "wasi".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Feature 'raw mode' not supported on platform 'wasi'"
        );
    }
}
