//! Low-level input handling for the HTML tokenizer.
//!
//! [`ParserInput`] encapsulates the decoded text, position tracking
//! (line, column, byte offset), and the scanning primitives the tokenizer
//! needs: peeking, advancing, case-insensitive lookahead, and checkpoints
//! for backtracking out of a speculative parse.

use crate::error::{ErrorSeverity, ParseDiagnostic, SourceLocation};

/// A snapshot of the input position (byte offset, line, column) and of the
/// number of diagnostics recorded so far.
///
/// Obtained via [`ParserInput::save_position`] and restored via
/// [`ParserInput::restore_position`]. The tokenizer uses it to re-read an
/// unterminated tag or comment as text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SavedPosition {
    pos: usize,
    line: u32,
    column: u32,
    diagnostics: usize,
}

/// Shared low-level input state.
///
/// Tracks the text, the current position, and accumulated diagnostics.
pub(crate) struct ParserInput<'a> {
    /// The decoded input.
    input: &'a str,

    /// Current byte offset in `input`. Always on a char boundary.
    pos: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (1-based, in characters).
    column: u32,

    /// Accumulated diagnostics.
    pub(crate) diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> ParserInput<'a> {
    /// Creates a new `ParserInput` over `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    // -- Position queries --

    /// Returns the current source location.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    /// Returns `true` if all input has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the unconsumed input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Saves the current position so it can be restored later with
    /// [`restore_position`](Self::restore_position).
    pub fn save_position(&self) -> SavedPosition {
        SavedPosition {
            pos: self.pos,
            line: self.line,
            column: self.column,
            diagnostics: self.diagnostics.len(),
        }
    }

    /// Restores a previously saved position. All progress since the
    /// [`save_position`](Self::save_position) call is discarded, including
    /// diagnostics recorded while scanning ahead.
    pub fn restore_position(&mut self, saved: SavedPosition) {
        self.pos = saved.pos;
        self.line = saved.line;
        self.column = saved.column;
        self.diagnostics.truncate(saved.diagnostics);
    }

    // -- Peek operations --

    /// Returns the byte at the current position without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Returns the byte at `current_position + offset` without consuming.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Returns the character at the current position without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    // -- Advance operations --

    /// Advances the position by `count` bytes, updating line/column.
    ///
    /// `count` must land on a char boundary; UTF-8 continuation bytes do
    /// not advance the column.
    pub fn advance(&mut self, count: usize) {
        let end = (self.pos + count).min(self.input.len());
        for &b in &self.input.as_bytes()[self.pos..end] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if b & 0xC0 != 0x80 {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Advances past one character, updating line/column.
    pub fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += ch.len_utf8();
    }

    /// Consumes and returns the next character, folding `\r\n` and a lone
    /// `\r` into `\n`.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.advance_char(ch);
        if ch == '\r' {
            if self.peek() == Some(b'\n') {
                self.advance(1);
            }
            return Some('\n');
        }
        Some(ch)
    }

    // -- Lookahead --

    /// Returns `true` if the remaining input starts with `s`.
    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.input.as_bytes()[self.pos..].starts_with(s)
    }

    /// Case-insensitive lookahead check (ASCII).
    pub fn looking_at_ci(&self, expected: &[u8]) -> bool {
        let bytes = self.input.as_bytes();
        if self.pos + expected.len() > bytes.len() {
            return false;
        }
        bytes[self.pos..self.pos + expected.len()].eq_ignore_ascii_case(expected)
    }

    /// Finds `needle` in the unconsumed input, returning its byte offset
    /// relative to the current position.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.remaining().find(needle)
    }

    // -- Whitespace --

    /// Skips whitespace characters. Returns `true` if any were consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_html_whitespace(b) {
                self.advance(1);
            } else {
                break;
            }
        }
        self.pos > start
    }

    // -- Take while --

    /// Consumes bytes while `pred` returns `true` and returns the span.
    ///
    /// `pred` is only ever asked about ASCII bytes; scanning stops at the
    /// first non-ASCII byte for which it returns `false`, so the span always
    /// ends on a char boundary as long as `pred` accepts or rejects all bytes
    /// of a multi-byte character alike.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut end = start;
        while end < bytes.len() && pred(bytes[end]) {
            end += 1;
        }
        while !self.input.is_char_boundary(end) {
            end += 1;
        }
        self.advance(end - start);
        &self.input[start..end]
    }

    // -- Diagnostics --

    /// Appends a diagnostic at the current location.
    pub fn push_diagnostic(&mut self, severity: ErrorSeverity, message: String) {
        self.diagnostics.push(ParseDiagnostic {
            severity,
            message,
            location: self.location(),
        });
    }
}

/// HTML whitespace: space, tab, LF, FF and CR.
pub(crate) fn is_html_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0C' | b'\r')
}
