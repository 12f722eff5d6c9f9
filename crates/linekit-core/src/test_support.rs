//! Scripted console doubles for unit tests.
//!
//! The full mock backend lives in `linekit-io`; these are the minimal
//! stand-ins the core crate's own tests need.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::console::{AsAny, ConsoleInput, ConsoleOutput, ConsoleResult};

/// Console input fed from a fixed byte script.
pub(crate) struct ScriptedInput {
    bytes: VecDeque<u8>,
    tty: bool,
    width: Option<u16>,
}

impl ScriptedInput {
    pub(crate) fn new(script: &[u8]) -> Self {
        ScriptedInput {
            bytes: script.iter().copied().collect(),
            tty: true,
            width: Some(80),
        }
    }

    pub(crate) fn non_tty(mut self) -> Self {
        self.tty = false;
        self
    }

    pub(crate) fn with_width(mut self, width: Option<u16>) -> Self {
        self.width = width;
        self
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl ConsoleInput for ScriptedInput {
    fn read_byte(&mut self) -> ConsoleResult<Option<u8>> {
        Ok(self.bytes.pop_front())
    }

    fn read_line(&mut self) -> ConsoleResult<Option<String>> {
        if self.bytes.is_empty() {
            return Ok(None);
        }
        let mut line = String::new();
        while let Some(ch) = self.bytes.pop_front() {
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

impl AsAny for ScriptedInput {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Console output captured into a shared string.
#[derive(Clone, Default)]
pub(crate) struct CapturedOutput {
    written: Arc<Mutex<String>>,
}

impl CapturedOutput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contents(&self) -> String {
        self.written.lock().unwrap().clone()
    }

    pub(crate) fn handle(&self) -> Arc<Mutex<String>> {
        Arc::clone(&self.written)
    }
}

impl ConsoleOutput for CapturedOutput {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        self.written.lock().unwrap().push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        Ok(())
    }
}

impl AsAny for CapturedOutput {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
