//! Console input/output abstraction traits and types.
//!
//! This module defines the contract between the editing state machine and a
//! terminal backend: a blocking byte source with raw-mode switching, a text
//! sink, and terminal width discovery. Platform implementations live in
//! `linekit-io`.

use std::fmt;

/// Helper trait for testing - allows downcasting to concrete types.
pub trait AsAny {
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// A character-at-a-time input source backed by a terminal or a stream.
pub trait ConsoleInput: Send + AsAny {
    /// Read one byte, blocking until input arrives.
    ///
    /// Interactive backends enter raw mode for the duration of the read and
    /// restore the previous mode before returning, even on failure. Returns
    /// `Ok(None)` when the underlying stream is exhausted.
    fn read_byte(&mut self) -> ConsoleResult<Option<u8>>;

    /// Read one complete line in cooked mode, including its terminator.
    ///
    /// Used by the non-interactive fallback path. Returns `Ok(None)` at end
    /// of input.
    fn read_line(&mut self) -> ConsoleResult<Option<String>>;

    /// Whether this source is attached to an interactive terminal.
    fn is_tty(&self) -> bool;

    /// Current terminal column count, if the backend can discover it.
    fn window_width(&self) -> Option<u16>;
}

/// A text sink for rendered output.
pub trait ConsoleOutput: Send + AsAny {
    /// Write text at the current cursor position.
    fn write_text(&mut self, text: &str) -> ConsoleResult<()>;

    /// Flush buffered output to the terminal.
    fn flush(&mut self) -> ConsoleResult<()>;
}

/// RAII guard for terminal raw mode.
///
/// The guard restores the previous terminal mode when dropped, so a read
/// that fails part-way still leaves the terminal usable.
pub struct RawModeGuard {
    restore_fn: Option<Box<dyn FnOnce() + Send>>,
    platform_info: String,
}

impl RawModeGuard {
    pub fn new<F>(restore_fn: F, platform_info: String) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
            platform_info,
        }
    }

    pub fn platform_info(&self) -> &str {
        &self.platform_info
    }

    /// Restore the terminal mode now instead of at drop time.
    pub fn restore(mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            restore_fn();
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            restore_fn();
        }
    }
}

/// Console operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleError {
    /// Platform-specific I/O error
    Io(String),
    /// Feature not supported on this platform
    UnsupportedFeature { feature: String, platform: String },
    /// Terminal setup/teardown error
    Terminal(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Io(msg) => write!(f, "I/O error: {msg}"),
            ConsoleError::UnsupportedFeature { feature, platform } => {
                write!(f, "Feature '{feature}' not supported on platform '{platform}'")
            }
            ConsoleError::Terminal(msg) => write!(f, "Terminal error: {msg}"),
        }
    }
}

impl std::error::Error for ConsoleError {}

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Column count assumed when no other source of truth is available.
pub const DEFAULT_COLUMNS: usize = 80;

/// Environment variable consulted when the backend cannot report a width.
pub const COLUMNS_ENV: &str = "COLUMNS";

/// Resolve the terminal width for rendering.
///
/// Falls back through the backend's own discovery (ioctl on the standard
/// descriptors, then the controlling terminal), the `COLUMNS` environment
/// variable, and finally [`DEFAULT_COLUMNS`].
pub fn terminal_width(input: &dyn ConsoleInput) -> usize {
    if let Some(cols) = input.window_width() {
        return cols as usize;
    }
    if let Ok(value) = std::env::var(COLUMNS_ENV) {
        if let Ok(cols) = value.parse::<usize>() {
            if cols > 0 {
                return cols;
            }
        }
    }
    log::debug!("terminal width unknown, assuming {DEFAULT_COLUMNS} columns");
    DEFAULT_COLUMNS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedInput;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_raw_mode_guard_restores_on_drop() {
        let restored = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&restored);
        {
            let _guard = RawModeGuard::new(move || flag.store(true, Ordering::Relaxed), "test".to_string());
        }
        assert!(restored.load(Ordering::Relaxed));
    }

    #[test]
    fn test_raw_mode_guard_manual_restore() {
        let restored = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&restored);
        let guard = RawModeGuard::new(move || flag.store(true, Ordering::Relaxed), "test".to_string());
        assert_eq!(guard.platform_info(), "test");
        guard.restore();
        assert!(restored.load(Ordering::Relaxed));
    }

    #[test]
    fn test_console_error_display() {
        assert_eq!(
            ConsoleError::Io("broken pipe".to_string()).to_string(),
            "I/O error: broken pipe"
        );
        let err = ConsoleError::UnsupportedFeature {
            feature: "console input".to_string(),
            platform: "redox".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Feature 'console input' not supported on platform 'redox'"
        );
    }

    #[test]
    fn test_terminal_width_prefers_backend() {
        let input = ScriptedInput::new(b"").with_width(Some(132));
        assert_eq!(terminal_width(&input), 132);
    }

    #[test]
    fn test_terminal_width_fallback_chain() {
        let input = ScriptedInput::new(b"").with_width(None);

        // COLUMNS wins when the backend has no answer.
        std::env::set_var(COLUMNS_ENV, "123");
        assert_eq!(terminal_width(&input), 123);

        // A garbage value falls through to the hard default.
        std::env::set_var(COLUMNS_ENV, "not-a-number");
        assert_eq!(terminal_width(&input), DEFAULT_COLUMNS);

        std::env::remove_var(COLUMNS_ENV);
        assert_eq!(terminal_width(&input), DEFAULT_COLUMNS);
    }
}
