//! Reader construction and the keystroke-driven read loop.
//!
//! A [`Reader`] is chosen once at construction: an [`InteractiveReader`]
//! when the input stream is an interactive terminal, a [`PlainReader`]
//! otherwise. The interactive variant runs the per-keystroke dispatch cycle
//! until the buffer ends with the line-terminator sentinel; the plain
//! variant reads whole lines with no editing and no hooks.

use std::collections::VecDeque;

use crate::buffer::EditBuffer;
use crate::console::{self, ConsoleInput, ConsoleOutput};
use crate::error::{EditError, EditResult};
use crate::hooks::{HookContext, HookTable};
use crate::key;
use crate::render::Renderer;

/// Configuration for building a reader.
///
/// `hooks` are merged over the default table: per character, caller hooks
/// run after the defaults, in registration order.
#[derive(Debug, Default)]
pub struct ReaderConfig {
    /// Prompt prefix displayed before user input.
    pub prompt: String,
    /// Extra hooks merged over the defaults.
    pub hooks: HookTable,
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        ReaderConfig {
            prompt: prompt.into(),
            hooks: HookTable::new(),
        }
    }
}

/// Result of a completed `read_line` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A finished line, stripped of its terminator when requested.
    Line(String),
    /// The read was aborted (Ctrl-C or an abort-line hook); the buffer was
    /// discarded. Not an error: callers decide how to surface it.
    Aborted,
}

impl ReadOutcome {
    pub fn into_line(self) -> Option<String> {
        match self {
            ReadOutcome::Line(line) => Some(line),
            ReadOutcome::Aborted => None,
        }
    }

    pub fn as_line(&self) -> Option<&str> {
        match self {
            ReadOutcome::Line(line) => Some(line),
            ReadOutcome::Aborted => None,
        }
    }
}

/// Outcome of one keystroke cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Continue,
    Aborted,
}

/// A line reader over a console, interactive or plain.
pub enum Reader {
    Interactive(InteractiveReader),
    Plain(PlainReader),
}

impl Reader {
    /// Build a reader, selecting the variant once from the tty probe.
    pub fn new(
        config: ReaderConfig,
        input: Box<dyn ConsoleInput>,
        output: Box<dyn ConsoleOutput>,
    ) -> EditResult<Self> {
        if input.is_tty() {
            Ok(Reader::Interactive(InteractiveReader::new(
                config, input, output,
            )?))
        } else {
            Ok(Reader::Plain(PlainReader::new(input)))
        }
    }

    /// Read one line.
    ///
    /// Bytes ≥128 read from an interactive terminal are passed through
    /// without being inserted or dispatched to hooks; they only trigger a
    /// repaint. This is a known limitation, kept for fidelity with the
    /// 7-bit editing model.
    pub fn read_line(&mut self, strip: bool) -> EditResult<ReadOutcome> {
        match self {
            Reader::Interactive(reader) => reader.read_line(strip),
            Reader::Plain(reader) => reader.read_line(strip),
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Reader::Interactive(_))
    }
}

/// Keystroke-driven editor over an interactive terminal.
pub struct InteractiveReader {
    buffer: EditBuffer,
    hooks: HookTable,
    pending: VecDeque<u8>,
    renderer: Renderer,
    input: Box<dyn ConsoleInput>,
    output: Box<dyn ConsoleOutput>,
}

impl InteractiveReader {
    /// Build an interactive reader; fails with
    /// [`EditError::InvalidSource`] when the input is not a terminal.
    pub fn new(
        config: ReaderConfig,
        input: Box<dyn ConsoleInput>,
        output: Box<dyn ConsoleOutput>,
    ) -> EditResult<Self> {
        if !input.is_tty() {
            return Err(EditError::InvalidSource(
                "input stream is not an interactive terminal".to_string(),
            ));
        }
        let mut hooks = HookTable::with_defaults();
        hooks.merge(config.hooks);
        Ok(InteractiveReader {
            buffer: EditBuffer::new(),
            hooks,
            pending: VecDeque::new(),
            renderer: Renderer::new(config.prompt),
            input,
            output,
        })
    }

    /// The line currently being edited.
    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Queue a synthetic keystroke, consumed before real input.
    pub fn push_input(&mut self, ch: u8) {
        self.pending.push_back(ch);
    }

    /// Read one line, looping the dispatch cycle until the buffer ends with
    /// the line-terminator sentinel.
    ///
    /// The buffer and cursor start fresh on every call; only the hook table
    /// and the pushback queue persist across reads.
    pub fn read_line(&mut self, strip: bool) -> EditResult<ReadOutcome> {
        self.buffer.reset();
        self.render()?;
        loop {
            match self.step()? {
                StepOutcome::Aborted => {
                    self.buffer.reset();
                    log::debug!("line read aborted by hook");
                    return Ok(ReadOutcome::Aborted);
                }
                StepOutcome::Continue => {
                    if self.buffer.is_terminated() {
                        break;
                    }
                }
            }
        }
        Ok(ReadOutcome::Line(self.buffer.take_line(strip)))
    }

    /// One keystroke cycle: fetch, normalize, dispatch hooks, apply default
    /// insertion/termination, clamp, repaint.
    fn step(&mut self) -> EditResult<StepOutcome> {
        let ch = match self.pending.pop_front() {
            Some(ch) => ch,
            None => match self.input.read_byte()? {
                Some(ch) => ch,
                None => return Err(EditError::EndOfInput),
            },
        };
        log::trace!("keystroke 0x{ch:02x}");

        // Bytes >= 128 never reach the hook table or the insertion path;
        // the row is repainted and the byte is otherwise ignored.
        if !ch.is_ascii() {
            self.render()?;
            return Ok(StepOutcome::Continue);
        }

        let ch = key::normalize(ch);

        let hooks = &self.hooks;
        let mut ctx = HookContext::new(
            &mut self.buffer,
            &mut self.pending,
            &mut *self.input,
            &mut *self.output,
            ch,
        );
        let dispatch = hooks.dispatch(&mut ctx)?;
        if dispatch.abort {
            return Ok(StepOutcome::Aborted);
        }

        if dispatch.ch == key::NEWLINE {
            // Appended verbatim so the read loop can observe completion.
            self.buffer.push_newline();
        } else if !dispatch.suppress && key::is_printable(dispatch.ch) {
            self.buffer.insert_at(self.buffer.cursor_position(), dispatch.ch);
        }
        self.buffer.clamp_cursor();
        self.render()?;
        Ok(StepOutcome::Continue)
    }

    fn render(&mut self) -> EditResult<()> {
        let width = console::terminal_width(self.input.as_ref());
        self.renderer.draw(&self.buffer, width, &mut *self.output)
    }
}

/// Line reader for non-interactive streams: one cooked read per line, no
/// hooks, no rendering.
pub struct PlainReader {
    input: Box<dyn ConsoleInput>,
}

impl PlainReader {
    pub fn new(input: Box<dyn ConsoleInput>) -> Self {
        PlainReader { input }
    }

    /// Read the stream's next line, removing carriage returns and, with
    /// `strip`, the trailing terminator. An empty read is end of input.
    pub fn read_line(&mut self, strip: bool) -> EditResult<ReadOutcome> {
        let line = match self.input.read_line()? {
            Some(line) if !line.is_empty() => line,
            _ => return Err(EditError::EndOfInput),
        };
        let mut line = line.replace('\r', "");
        if strip && line.ends_with('\n') {
            line.pop();
        }
        Ok(ReadOutcome::Line(line))
    }
}
