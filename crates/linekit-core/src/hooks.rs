//! Keystroke hook registration and dispatch.
//!
//! A hook is a handler invoked when a specific character code is read. The
//! [`HookTable`] maps each character to an ordered handler list: handlers run
//! in registration order against a mutable "current character" cell, and the
//! table folds their outcomes into a single [`Dispatch`] describing what the
//! keystroke ultimately was and whether default insertion still applies.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::buffer::EditBuffer;
use crate::console::{ConsoleInput, ConsoleOutput};
use crate::error::{EditError, EditResult};
use crate::key;

/// Columns jumped by the Esc-b / Esc-f word-motion approximation.
pub const WORD_JUMP_COLUMNS: usize = 10;

/// Outcome returned by a single hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// Allow default post-processing for this keystroke.
    Continue,
    /// Skip default insertion of this character.
    Suppress,
    /// Discard the buffer and end the read immediately.
    AbortLine,
}

/// A keystroke handler.
///
/// Hooks may mutate the buffer and cursor through the context, rewrite the
/// current character, and read ahead from the input source.
pub type Hook = Box<dyn Fn(&mut HookContext<'_>) -> EditResult<HookOutcome> + Send + Sync>;

/// Editor state handed to each hook.
pub struct HookContext<'a> {
    /// The line being edited.
    pub buffer: &'a mut EditBuffer,
    current: u8,
    pending: &'a mut VecDeque<u8>,
    input: &'a mut dyn ConsoleInput,
    output: &'a mut dyn ConsoleOutput,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        buffer: &'a mut EditBuffer,
        pending: &'a mut VecDeque<u8>,
        input: &'a mut dyn ConsoleInput,
        output: &'a mut dyn ConsoleOutput,
        current: u8,
    ) -> Self {
        HookContext {
            buffer,
            current,
            pending,
            input,
            output,
        }
    }

    /// The character being dispatched, as last rewritten.
    pub fn current_char(&self) -> u8 {
        self.current
    }

    /// Rewrite the character being dispatched.
    ///
    /// Later hooks and the default insertion step observe the rewritten
    /// value.
    pub fn set_current_char(&mut self, ch: u8) {
        self.current = ch;
    }

    /// Read one character, consulting the pushback queue before blocking on
    /// the real source.
    ///
    /// This is how the escape decoder looks ahead without touching the
    /// dispatch loop.
    pub fn read_char(&mut self) -> EditResult<u8> {
        if let Some(ch) = self.pending.pop_front() {
            return Ok(ch);
        }
        match self.input.read_byte()? {
            Some(ch) => Ok(ch),
            None => Err(EditError::EndOfInput),
        }
    }

    /// Queue a synthetic character to be consumed before real input.
    pub fn push_back(&mut self, ch: u8) {
        self.pending.push_back(ch);
    }

    /// Write text to the console and flush it.
    pub fn write(&mut self, text: &str) -> EditResult<()> {
        self.output.write_text(text)?;
        self.output.flush()?;
        Ok(())
    }
}

/// Folded result of running every hook registered for a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// The character as last rewritten by the hooks.
    pub ch: u8,
    /// Whether any hook suppressed default insertion.
    pub suppress: bool,
    /// Whether a hook aborted the read.
    pub abort: bool,
}

/// Mapping from a character to its ordered handler list.
#[derive(Default)]
pub struct HookTable {
    entries: HashMap<u8, Vec<Hook>>,
}

impl HookTable {
    /// Create an empty table with no handlers at all.
    pub fn new() -> Self {
        HookTable {
            entries: HashMap::new(),
        }
    }

    /// Create a table populated with the default editing hooks.
    pub fn with_defaults() -> Self {
        let mut table = HookTable::new();
        table.register(key::CTRL_A, Box::new(defaults::beginning));
        table.register(key::CTRL_E, Box::new(defaults::end));
        table.register(key::CTRL_C, Box::new(defaults::interrupt));
        table.register(key::CTRL_D, Box::new(defaults::eof));
        table.register(key::CTRL_K, Box::new(defaults::kill_right));
        table.register(key::CTRL_U, Box::new(defaults::kill_left));
        table.register(key::CTRL_T, Box::new(defaults::transpose));
        table.register(key::ESCAPE, Box::new(defaults::escape));
        table.register(key::CTRL_BACKSLASH, Box::new(defaults::quit));
        table.register(key::DELETE, Box::new(defaults::backspace));
        table
    }

    /// Append a handler to the list for `ch`, preserving prior entries.
    pub fn register(&mut self, ch: u8, hook: Hook) {
        self.entries.entry(ch).or_default().push(hook);
    }

    /// The ordered handler list for `ch`; empty if none registered.
    pub fn lookup(&self, ch: u8) -> &[Hook] {
        self.entries.get(&ch).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fold another table into this one, appending per character.
    ///
    /// Existing handlers (including the defaults) are never removed, only
    /// extended.
    pub fn merge(&mut self, other: HookTable) {
        for (ch, hooks) in other.entries {
            self.entries.entry(ch).or_default().extend(hooks);
        }
    }

    /// Run every handler registered for the context's current character, in
    /// registration order, folding their outcomes.
    ///
    /// The handler list is chosen by the character as it was first
    /// dispatched; a hook that rewrites the character changes what later
    /// hooks and the default insertion step see, not which list runs. An
    /// abort ends the fold immediately.
    pub fn dispatch(&self, ctx: &mut HookContext<'_>) -> EditResult<Dispatch> {
        let mut suppress = false;
        if let Some(hooks) = self.entries.get(&ctx.current_char()) {
            for hook in hooks {
                match hook(ctx)? {
                    HookOutcome::Continue => {}
                    HookOutcome::Suppress => suppress = true,
                    HookOutcome::AbortLine => {
                        return Ok(Dispatch {
                            ch: ctx.current_char(),
                            suppress,
                            abort: true,
                        })
                    }
                }
            }
        }
        Ok(Dispatch {
            ch: ctx.current_char(),
            suppress,
            abort: false,
        })
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(u8, usize)> =
            self.entries.iter().map(|(ch, hooks)| (*ch, hooks.len())).collect();
        entries.sort_unstable();
        f.debug_map()
            .entries(entries.iter().map(|(ch, n)| (format!("0x{ch:02x}"), n)))
            .finish()
    }
}

/// The default editing hooks.
///
/// These are installed by [`HookTable::with_defaults`] and may also be
/// registered individually when composing a custom table.
pub mod defaults {
    use super::*;

    /// Ctrl-A: cursor to the beginning of the line.
    pub fn beginning(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        ctx.buffer.set_cursor_position(0);
        Ok(HookOutcome::Continue)
    }

    /// Ctrl-E: cursor to the end of the line.
    pub fn end(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        let len = ctx.buffer.len();
        ctx.buffer.set_cursor_position(len);
        Ok(HookOutcome::Continue)
    }

    /// Ctrl-C: discard the line, notify with a newline, abort the read.
    pub fn interrupt(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        ctx.buffer.reset();
        ctx.write("\n")?;
        Ok(HookOutcome::AbortLine)
    }

    /// Ctrl-D: raise end-of-input, propagated to the caller.
    pub fn eof(_ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        Err(EditError::EndOfInput)
    }

    /// Ctrl-K: delete from the cursor to the end of the line.
    pub fn kill_right(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        let rest = ctx.buffer.len().saturating_sub(ctx.buffer.cursor_position());
        ctx.buffer.delete(rest);
        Ok(HookOutcome::Continue)
    }

    /// Ctrl-U: delete everything before the cursor.
    pub fn kill_left(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        let before = ctx.buffer.cursor_position();
        ctx.buffer.delete_before_cursor(before);
        Ok(HookOutcome::Continue)
    }

    /// Ctrl-T: transpose the character at the cursor with its predecessor.
    pub fn transpose(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        ctx.buffer.transpose();
        Ok(HookOutcome::Continue)
    }

    /// Esc: decode arrow-key and word-jump sequences.
    ///
    /// Reads ahead through the pushback queue: `[C`/`[D` move the cursor by
    /// one column, `f`/`b` jump by [`WORD_JUMP_COLUMNS`]. Unrecognized
    /// sequences are consumed and dropped.
    pub fn escape(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        match ctx.read_char()? {
            b'[' => match ctx.read_char()? {
                b'C' => ctx.buffer.cursor_right(1),
                b'D' => ctx.buffer.cursor_left(1),
                _ => {}
            },
            b'f' => ctx.buffer.cursor_right(WORD_JUMP_COLUMNS),
            b'b' => ctx.buffer.cursor_left(WORD_JUMP_COLUMNS),
            _ => {}
        }
        Ok(HookOutcome::Continue)
    }

    /// Ctrl-\: print a newline and terminate the process. Not recoverable.
    pub fn quit(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        let _ = ctx.write("\n");
        std::process::exit(1);
    }

    /// DEL: remove the character before the cursor; no-op at position 0.
    pub fn backspace(ctx: &mut HookContext<'_>) -> EditResult<HookOutcome> {
        ctx.buffer.delete_before_cursor(1);
        Ok(HookOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CapturedOutput, ScriptedInput};

    fn run_dispatch(
        table: &HookTable,
        buffer: &mut EditBuffer,
        script: &[u8],
        ch: u8,
    ) -> EditResult<Dispatch> {
        let mut pending = VecDeque::new();
        let mut input = ScriptedInput::new(script);
        let mut output = CapturedOutput::new();
        let mut ctx = HookContext::new(buffer, &mut pending, &mut input, &mut output, ch);
        table.dispatch(&mut ctx)
    }

    #[test]
    fn test_lookup_empty_for_unregistered() {
        let table = HookTable::new();
        assert!(table.lookup(b'a').is_empty());
    }

    #[test]
    fn test_defaults_cover_the_control_codes() {
        let table = HookTable::with_defaults();
        for ch in [
            key::CTRL_A,
            key::CTRL_C,
            key::CTRL_D,
            key::CTRL_E,
            key::CTRL_K,
            key::CTRL_T,
            key::CTRL_U,
            key::CTRL_BACKSLASH,
            key::ESCAPE,
            key::DELETE,
        ] {
            assert_eq!(table.lookup(ch).len(), 1, "0x{ch:02x}");
        }
        assert!(table.lookup(b'a').is_empty());
    }

    #[test]
    fn test_register_appends_after_defaults() {
        let mut table = HookTable::with_defaults();
        table.register(key::CTRL_A, Box::new(|_ctx| Ok(HookOutcome::Continue)));
        assert_eq!(table.lookup(key::CTRL_A).len(), 2);
    }

    #[test]
    fn test_merge_extends_per_character() {
        let mut table = HookTable::with_defaults();
        let mut extra = HookTable::new();
        extra.register(key::CTRL_A, Box::new(|_ctx| Ok(HookOutcome::Suppress)));
        extra.register(b'x', Box::new(|_ctx| Ok(HookOutcome::Continue)));
        table.merge(extra);
        assert_eq!(table.lookup(key::CTRL_A).len(), 2);
        assert_eq!(table.lookup(b'x').len(), 1);
    }

    #[test]
    fn test_dispatch_runs_in_registration_order() {
        let mut table = HookTable::new();
        table.register(
            b'x',
            Box::new(|ctx| {
                ctx.set_current_char(b'y');
                Ok(HookOutcome::Continue)
            }),
        );
        // The second hook observes the rewrite made by the first.
        table.register(
            b'x',
            Box::new(|ctx| {
                assert_eq!(ctx.current_char(), b'y');
                ctx.set_current_char(b'z');
                Ok(HookOutcome::Continue)
            }),
        );

        let mut buffer = EditBuffer::new();
        let dispatch = run_dispatch(&table, &mut buffer, b"", b'x').unwrap();
        assert_eq!(dispatch.ch, b'z');
        assert!(!dispatch.suppress);
        assert!(!dispatch.abort);
    }

    #[test]
    fn test_dispatch_any_suppress_wins() {
        let mut table = HookTable::new();
        table.register(b'!', Box::new(|_ctx| Ok(HookOutcome::Suppress)));
        table.register(b'!', Box::new(|_ctx| Ok(HookOutcome::Continue)));

        let mut buffer = EditBuffer::new();
        let dispatch = run_dispatch(&table, &mut buffer, b"", b'!').unwrap();
        assert!(dispatch.suppress);
    }

    #[test]
    fn test_dispatch_abort_stops_the_fold() {
        let mut table = HookTable::new();
        table.register(b'q', Box::new(|_ctx| Ok(HookOutcome::AbortLine)));
        table.register(b'q', Box::new(|_ctx| panic!("must not run after abort")));

        let mut buffer = EditBuffer::new();
        let dispatch = run_dispatch(&table, &mut buffer, b"", b'q').unwrap();
        assert!(dispatch.abort);
    }

    #[test]
    fn test_dispatch_propagates_hook_errors() {
        let mut table = HookTable::new();
        table.register(
            b'e',
            Box::new(|_ctx| Err(EditError::Hook("boom".to_string()))),
        );

        let mut buffer = EditBuffer::new();
        let err = run_dispatch(&table, &mut buffer, b"", b'e').unwrap_err();
        assert_eq!(err, EditError::Hook("boom".to_string()));
    }

    #[test]
    fn test_beginning_and_end_round_trip() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        for ch in b"hello" {
            buffer.insert_at(buffer.cursor_position(), *ch);
        }

        run_dispatch(&table, &mut buffer, b"", key::CTRL_A).unwrap();
        assert_eq!(buffer.cursor_position(), 0);
        run_dispatch(&table, &mut buffer, b"", key::CTRL_E).unwrap();
        assert_eq!(buffer.cursor_position(), 5);
    }

    #[test]
    fn test_kill_right_then_kill_left_empties() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        for ch in b"hello" {
            buffer.insert_at(buffer.cursor_position(), *ch);
        }
        buffer.set_cursor_position(2);

        run_dispatch(&table, &mut buffer, b"", key::CTRL_K).unwrap();
        assert_eq!(buffer.text(), "he");
        run_dispatch(&table, &mut buffer, b"", key::CTRL_U).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor_position(), 0);
    }

    #[test]
    fn test_interrupt_clears_and_aborts() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        buffer.insert_at(0, b'a');

        let mut pending = VecDeque::new();
        let mut input = ScriptedInput::new(b"");
        let mut output = CapturedOutput::new();
        let captured = output.handle();
        let mut ctx =
            HookContext::new(&mut buffer, &mut pending, &mut input, &mut output, key::CTRL_C);
        let dispatch = table.dispatch(&mut ctx).unwrap();

        assert!(dispatch.abort);
        assert!(buffer.is_empty());
        assert_eq!(captured.lock().unwrap().as_str(), "\n");
    }

    #[test]
    fn test_eof_raises_end_of_input() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        let err = run_dispatch(&table, &mut buffer, b"", key::CTRL_D).unwrap_err();
        assert_eq!(err, EditError::EndOfInput);
    }

    #[test]
    fn test_escape_decodes_arrows() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        for ch in b"abc" {
            buffer.insert_at(buffer.cursor_position(), *ch);
        }

        run_dispatch(&table, &mut buffer, b"[D", key::ESCAPE).unwrap();
        assert_eq!(buffer.cursor_position(), 2);
        run_dispatch(&table, &mut buffer, b"[C", key::ESCAPE).unwrap();
        assert_eq!(buffer.cursor_position(), 3);
    }

    #[test]
    fn test_escape_word_jumps_clamp() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        for ch in b"abc" {
            buffer.insert_at(buffer.cursor_position(), *ch);
        }

        run_dispatch(&table, &mut buffer, b"b", key::ESCAPE).unwrap();
        assert_eq!(buffer.cursor_position(), 0);
        run_dispatch(&table, &mut buffer, b"f", key::ESCAPE).unwrap();
        assert_eq!(buffer.cursor_position(), 3);
    }

    #[test]
    fn test_escape_prefers_pushback_queue() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        for ch in b"abc" {
            buffer.insert_at(buffer.cursor_position(), *ch);
        }

        let mut pending = VecDeque::from(vec![b'[', b'D']);
        // The real source holds bytes that must not be consumed.
        let mut input = ScriptedInput::new(b"zz");
        let mut output = CapturedOutput::new();
        let mut ctx =
            HookContext::new(&mut buffer, &mut pending, &mut input, &mut output, key::ESCAPE);
        table.dispatch(&mut ctx).unwrap();

        assert_eq!(buffer.cursor_position(), 2);
        assert!(pending.is_empty());
        assert_eq!(input.remaining(), 2);
    }

    #[test]
    fn test_escape_at_end_of_input_propagates() {
        let table = HookTable::with_defaults();
        let mut buffer = EditBuffer::new();
        let err = run_dispatch(&table, &mut buffer, b"", key::ESCAPE).unwrap_err();
        assert_eq!(err, EditError::EndOfInput);
    }

    #[test]
    fn test_push_back_is_fifo() {
        let mut buffer = EditBuffer::new();
        let mut pending = VecDeque::new();
        let mut input = ScriptedInput::new(b"");
        let mut output = CapturedOutput::new();
        let mut ctx = HookContext::new(&mut buffer, &mut pending, &mut input, &mut output, 0);

        ctx.push_back(b'1');
        ctx.push_back(b'2');
        assert_eq!(ctx.read_char().unwrap(), b'1');
        assert_eq!(ctx.read_char().unwrap(), b'2');
        assert_eq!(ctx.read_char().unwrap_err(), EditError::EndOfInput);
    }

    #[test]
    fn test_debug_lists_handler_counts() {
        let mut table = HookTable::new();
        table.register(b'a', Box::new(|_ctx| Ok(HookOutcome::Continue)));
        table.register(b'a', Box::new(|_ctx| Ok(HookOutcome::Continue)));
        let repr = format!("{table:?}");
        assert!(repr.contains("0x61"));
        assert!(repr.contains('2'));
    }
}
