//! # Linekit: keystroke-driven line input
//!
//! Linekit reads raw keystrokes one at a time, maintains an in-memory edit
//! buffer and cursor, repaints the visible line after every keystroke, and
//! hands the finished line back when the user presses Enter. When the input
//! stream is not an interactive terminal it falls back to plain line reads,
//! so programs behave the same under a pipe as under a tty.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linekit::prelude::*;
//!
//! fn main() -> EditResult<()> {
//!     let mut reader = ReaderBuilder::new().with_prompt("> ").build()?;
//!     match reader.read_line(true)? {
//!         ReadOutcome::Line(line) => println!("you typed: {line}"),
//!         ReadOutcome::Aborted => println!("(interrupted)"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Editing state machine** (`linekit-core`): edit buffer, hook table,
//!   dispatch loop, renderer, reader facade
//! - **Platform I/O** (`linekit-io`): Unix termios backend plus a scripted
//!   mock backend for tests
//! - **High-level API** (`linekit`): builder and convenience entry points -
//!   this crate
//!
//! ## Custom hooks
//!
//! Every keystroke dispatches through an ordered hook table. Caller hooks
//! are merged after the defaults and may move the cursor, rewrite the
//! character being typed, suppress its insertion, or abort the read:
//!
//! ```no_run
//! use linekit::prelude::*;
//!
//! let mut reader = ReaderBuilder::new()
//!     .with_prompt("> ")
//!     // Type '!' and nothing is inserted.
//!     .with_hook(b'!', Box::new(|_ctx| Ok(HookOutcome::Suppress)))
//!     .build()
//!     .expect("failed to build reader");
//! ```
//!
//! ## Known limitation
//!
//! Editing is 7-bit: only printable ASCII is insertable, and bytes ≥128
//! read from a terminal are passed through without being interpreted or
//! inserted (they still trigger a repaint).

// Re-export the editing state machine from linekit-core
pub use linekit_core::{
    // Buffer and cursor state
    buffer::EditBuffer,
    // Error handling
    error::{EditError, EditResult},
    // Keystroke hooks
    hooks::{defaults, Dispatch, Hook, HookContext, HookOutcome, HookTable},
    // Character codes
    key,
    // Reader facade
    reader::{InteractiveReader, PlainReader, ReadOutcome, Reader, ReaderConfig},
    // Rendering
    render::{cursor_column, visible_suffix, Renderer},
    // Console trait definitions
    console::{
        terminal_width, AsAny, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult,
        RawModeGuard, COLUMNS_ENV, DEFAULT_COLUMNS,
    },
};

// Re-export I/O implementations from linekit-io
pub use linekit_io::*;

/// Builds a [`Reader`] over the process console or an injected backend.
///
/// Mirrors the two-step construction of the underlying types: collect the
/// prompt and hook overrides, then pick the interactive or plain variant
/// from the tty probe at `build` time.
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    config: ReaderConfig,
}

impl ReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prompt rendered before user input.
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.config.prompt = prompt.to_string();
        self
    }

    /// Append a hook for `ch`, run after any default handler for it.
    pub fn with_hook(mut self, ch: u8, hook: Hook) -> Self {
        self.config.hooks.register(ch, hook);
        self
    }

    /// Build a reader over the process stdin/stdout.
    pub fn build(self) -> EditResult<Reader> {
        let (input, output) = create_console_io()?;
        Reader::new(self.config, input, output)
    }

    /// Build a reader over an injected console pair.
    ///
    /// This is how tests drive the editor over the mock backend.
    pub fn build_with_console(
        self,
        input: Box<dyn ConsoleInput>,
        output: Box<dyn ConsoleOutput>,
    ) -> EditResult<Reader> {
        Reader::new(self.config, input, output)
    }
}

/// Convenient re-exports for common usage patterns
///
/// Import everything you need with `use linekit::prelude::*;`
pub mod prelude {
    // Reader construction and outcomes
    pub use crate::ReaderBuilder;
    pub use linekit_core::reader::{ReadOutcome, Reader, ReaderConfig};

    // Hook system
    pub use linekit_core::hooks::{defaults, Hook, HookContext, HookOutcome, HookTable};

    // Error handling
    pub use linekit_core::error::{EditError, EditResult};

    // Character codes
    pub use linekit_core::key;

    // Console I/O (backends from linekit-io)
    pub use linekit_core::console::{ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult};
    pub use linekit_io::{create_console_io, MockConsoleInput, MockConsoleOutput};
}

/// Convenience functions for common use cases
pub mod convenience {
    use crate::prelude::*;

    /// Read one line from the process console with the given prompt.
    ///
    /// Builds a throwaway reader; for repeated reads keep a
    /// [`ReaderBuilder`]-built reader instead so the hook table and
    /// pushback queue persist.
    pub fn read_line(prompt: &str) -> EditResult<ReadOutcome> {
        let mut reader = ReaderBuilder::new().with_prompt(prompt).build()?;
        reader.read_line(true)
    }
}
