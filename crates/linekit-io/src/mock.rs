//! Mock console implementations for testing.
//!
//! The mock input replays a scripted byte sequence; the mock output captures
//! everything written to it. Both share their state behind `Arc<Mutex<…>>`,
//! so a clone kept by the test keeps observing after the original has been
//! boxed into a reader.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use linekit_core::{AsAny, ConsoleInput, ConsoleOutput, ConsoleResult};

/// Mock console input fed from a scripted byte queue.
#[derive(Clone)]
pub struct MockConsoleInput {
    script: Arc<Mutex<VecDeque<u8>>>,
    tty: bool,
    width: Option<u16>,
}

impl Default for MockConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConsoleInput {
    /// A terminal-like mock: tty, 80 columns, empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            tty: true,
            width: Some(80),
        }
    }

    /// A stream-like mock, as seen when input is piped or redirected.
    pub fn non_tty() -> Self {
        Self {
            tty: false,
            width: None,
            ..Self::new()
        }
    }

    /// Override the reported window width (`None` forces the environment
    /// fallback chain).
    pub fn with_width(mut self, width: Option<u16>) -> Self {
        self.width = width;
        self
    }

    /// Queue raw bytes for the reader to consume.
    pub fn push_bytes(&self, bytes: &[u8]) {
        let mut script = self.script.lock().unwrap();
        script.extend(bytes.iter().copied());
    }

    /// Queue text as a sequence of keystrokes.
    pub fn push_text(&self, text: &str) {
        self.push_bytes(text.as_bytes());
    }

    /// Number of scripted bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl ConsoleInput for MockConsoleInput {
    fn read_byte(&mut self) -> ConsoleResult<Option<u8>> {
        Ok(self.script.lock().unwrap().pop_front())
    }

    fn read_line(&mut self) -> ConsoleResult<Option<String>> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Ok(None);
        }
        let mut line = String::new();
        while let Some(ch) = script.pop_front() {
            line.push(ch as char);
            if ch == b'\n' {
                break;
            }
        }
        Ok(Some(line))
    }

    fn is_tty(&self) -> bool {
        self.tty
    }

    fn window_width(&self) -> Option<u16> {
        self.width
    }
}

impl AsAny for MockConsoleInput {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Mock console output capturing everything written to it.
#[derive(Clone, Default)]
pub struct MockConsoleOutput {
    written: Arc<Mutex<Vec<u8>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get captured output for testing.
    pub fn output(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }

    /// Get captured output as a string for testing.
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output()).to_string()
    }

    /// Number of flushes observed.
    pub fn flushes(&self) -> usize {
        *self.flush_count.lock().unwrap()
    }

    /// Clear captured output.
    pub fn clear(&self) {
        self.written.lock().unwrap().clear();
        *self.flush_count.lock().unwrap() = 0;
    }
}

impl ConsoleOutput for MockConsoleOutput {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        self.written.lock().unwrap().extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        *self.flush_count.lock().unwrap() += 1;
        Ok(())
    }
}

impl AsAny for MockConsoleOutput {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
