//! Error kinds for Agony operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to react; the message and
/// context only help humans locate the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid configuration or parameters
    ConfigInvalid,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Arena errors
    // =========================================================================
    /// A program is longer than the configured maximum
    ProgramTooLong,

    /// An arena needs at least two agents
    TooFewAgents,

    /// No free offset left to place an agent
    PlacementFailed,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// IO operation was interrupted before completing
    Interrupted,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Failed to parse input (e.g. a configuration file)
    ParseFailed,

    /// Serialization/deserialization failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::InvalidArgument => "InvalidArgument",

            // Arena
            ErrorKind::ProgramTooLong => "ProgramTooLong",
            ErrorKind::TooFewAgents => "TooFewAgents",
            ErrorKind::PlacementFailed => "PlacementFailed",

            // IO
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",
            ErrorKind::Interrupted => "Interrupted",

            // Parse
            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::SerializationFailed => "SerializationFailed",
        }
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Interrupted)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::ProgramTooLong.to_string(), "ProgramTooLong");
        assert_eq!(ErrorKind::ConfigInvalid.to_string(), "ConfigInvalid");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::Interrupted.is_retryable());
        assert!(!ErrorKind::IoFailed.is_retryable());
        assert!(!ErrorKind::ProgramTooLong.is_retryable());
        assert!(!ErrorKind::PlacementFailed.is_retryable());
    }
}
