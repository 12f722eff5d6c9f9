//! Character codes and classification used by keystroke dispatch.
//!
//! The editor works on single 8-bit code units. Codes 0–31 and 127 are
//! control codes, 32–126 are printable, and anything ≥128 is treated as an
//! opaque pass-through byte that never participates in editing.

/// Ctrl-A: move the cursor to the beginning of the line.
pub const CTRL_A: u8 = 0x01;
/// Ctrl-C: discard the line and abort the read.
pub const CTRL_C: u8 = 0x03;
/// Ctrl-D: signal end of input.
pub const CTRL_D: u8 = 0x04;
/// Ctrl-E: move the cursor to the end of the line.
pub const CTRL_E: u8 = 0x05;
/// Ctrl-K: delete from the cursor to the end of the line.
pub const CTRL_K: u8 = 0x0b;
/// Ctrl-T: transpose the character at the cursor with its predecessor.
pub const CTRL_T: u8 = 0x14;
/// Ctrl-U: delete everything before the cursor.
pub const CTRL_U: u8 = 0x15;
/// Ctrl-\: terminate the whole process.
pub const CTRL_BACKSLASH: u8 = 0x1c;
/// Escape introducer for multi-byte sequences (arrow keys, word jumps).
pub const ESCAPE: u8 = 0x1b;
/// DEL, sent by the backspace key on most terminals.
pub const DELETE: u8 = 0x7f;

/// The canonical line-terminator sentinel.
pub const NEWLINE: u8 = b'\n';
/// Carriage return, normalized to [`NEWLINE`] before dispatch.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Whether `ch` falls in the printable ASCII range `[0x20, 0x7e]`.
///
/// Only printable characters are inserted by the default dispatch path.
pub fn is_printable(ch: u8) -> bool {
    (0x20..=0x7e).contains(&ch)
}

/// Normalize a carriage return to the canonical line terminator.
///
/// Hooks registered against the terminator are portable across platforms
/// because normalization happens before any hook runs.
pub fn normalize(ch: u8) -> u8 {
    if ch == CARRIAGE_RETURN {
        NEWLINE
    } else {
        ch
    }
}
