//! Display rendering for the interactive editor.
//!
//! The renderer recomputes the whole visible row on every call rather than
//! diffing against the previous frame: erase the row, write the prompt and
//! the visible tail of the line, then walk the cursor out from column zero.
//! A full repaint stays correct across terminal resizes between keystrokes.

use crate::buffer::EditBuffer;
use crate::console::ConsoleOutput;
use crate::error::EditResult;

/// ANSI sequence moving the cursor right by one column.
pub const CURSOR_RIGHT: &str = "\x1b[C";

/// Paints the prompt and the visible slice of the line.
pub struct Renderer {
    prompt: String,
}

impl Renderer {
    pub fn new(prompt: impl Into<String>) -> Self {
        Renderer {
            prompt: prompt.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Repaint the current row for `buffer` within `width` columns.
    ///
    /// The line is left-truncated so the most recent edits are always
    /// visible; the cursor column never exceeds `width`.
    pub fn draw(
        &self,
        buffer: &EditBuffer,
        width: usize,
        output: &mut dyn ConsoleOutput,
    ) -> EditResult<()> {
        let suffix = visible_suffix(buffer.text(), self.prompt.len(), width);
        let column = cursor_column(buffer.cursor_position(), self.prompt.len(), width);

        let mut frame = String::with_capacity(2 * width + self.prompt.len() + suffix.len() + 3);
        frame.push('\r');
        frame.push_str(&" ".repeat(width));
        frame.push('\r');
        frame.push_str(&self.prompt);
        frame.push_str(suffix);
        frame.push('\r');
        for _ in 0..column {
            frame.push_str(CURSOR_RIGHT);
        }

        output.write_text(&frame)?;
        output.flush()?;
        Ok(())
    }
}

/// The tail of `line` that fits beside a prompt of `prompt_len` characters
/// in `width` columns.
///
/// `line` must be ASCII (the edit buffer guarantees this). When the line is
/// short enough the whole of it is returned.
pub fn visible_suffix(line: &str, prompt_len: usize, width: usize) -> &str {
    let visible = width.saturating_sub(prompt_len + 1);
    &line[line.len().saturating_sub(visible)..]
}

/// The screen column for a cursor at `cursor`, capped at `width`.
pub fn cursor_column(cursor: usize, prompt_len: usize, width: usize) -> usize {
    width.min(cursor + prompt_len)
}
