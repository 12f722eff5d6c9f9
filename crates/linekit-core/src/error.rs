//! Error types for line reading operations.

use std::fmt;

use crate::console::ConsoleError;

/// Errors surfaced by a reader.
///
/// An interrupted read (Ctrl-C) is not an error; it is reported as
/// [`crate::reader::ReadOutcome::Aborted`] so callers decide how to surface
/// it.
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// No more input is available from the underlying stream.
    EndOfInput,
    /// The input stream cannot back an interactive editor.
    InvalidSource(String),
    /// Console backend failure.
    Console(ConsoleError),
    /// A registered hook failed.
    Hook(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::EndOfInput => write!(f, "end of input"),
            EditError::InvalidSource(msg) => write!(f, "invalid input source: {msg}"),
            EditError::Console(e) => write!(f, "console error: {e}"),
            EditError::Hook(msg) => write!(f, "hook error: {msg}"),
        }
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditError::Console(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConsoleError> for EditError {
    fn from(err: ConsoleError) -> Self {
        EditError::Console(err)
    }
}

/// Result type for reader operations.
pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(EditError::EndOfInput.to_string(), "end of input");
        assert_eq!(
            EditError::InvalidSource("not a terminal".to_string()).to_string(),
            "invalid input source: not a terminal"
        );
        assert_eq!(
            EditError::Hook("boom".to_string()).to_string(),
            "hook error: boom"
        );
    }

    #[test]
    fn test_console_error_conversion() {
        let err: EditError = ConsoleError::Io("read failed".to_string()).into();
        assert_eq!(err.to_string(), "console error: I/O error: read failed");

        use std::error::Error;
        assert!(err.source().is_some());
        assert!(EditError::EndOfInput.source().is_none());
    }
}
