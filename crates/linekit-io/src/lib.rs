//! Console backends for linekit.
//!
//! Provides the platform implementations of the `linekit-core` console
//! traits:
//! - UnixConsoleInput / UnixConsoleOutput (POSIX termios + VT)
//! - MockConsoleInput / MockConsoleOutput (scripted, for tests)

use std::io;

// Re-export core types and traits
pub use linekit_core::{
    AsAny, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard,
};

// Helper function to convert io::Error to ConsoleError
pub fn io_error_to_console_error(e: io::Error) -> ConsoleError {
    ConsoleError::Io(e.to_string())
}

/// Create both console input and output for the current platform.
pub fn create_console_io() -> ConsoleResult<(Box<dyn ConsoleInput>, Box<dyn ConsoleOutput>)> {
    let input = create_console_input()?;
    let output = create_console_output()?;
    Ok((input, output))
}

/// Create console input for the current platform.
pub fn create_console_input() -> ConsoleResult<Box<dyn ConsoleInput>> {
    #[cfg(unix)]
    {
        let input = unix::UnixConsoleInput::new().map_err(io_error_to_console_error)?;
        Ok(Box::new(input))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console input".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create console output for the current platform.
pub fn create_console_output() -> ConsoleResult<Box<dyn ConsoleOutput>> {
    #[cfg(unix)]
    {
        Ok(Box::new(unix::UnixConsoleOutput::new()))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console output".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create mock console I/O for testing.
pub fn create_mock_console_io() -> (Box<dyn ConsoleInput>, Box<dyn ConsoleOutput>) {
    (
        Box::new(mock::MockConsoleInput::new()),
        Box::new(mock::MockConsoleOutput::new()),
    )
}

// Platform-specific modules
#[cfg(unix)]
mod unix;

// Mock implementation for testing
pub mod mock;

// Re-export platform implementations
#[cfg(unix)]
pub use unix::{UnixConsoleInput, UnixConsoleOutput};

pub use mock::{MockConsoleInput, MockConsoleOutput};
