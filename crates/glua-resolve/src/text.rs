//! Lexical text primitives
//!
//! Resolution is purely textual: no parse tree, just word extraction and the
//! reconstruction of dotted identifier chains around a cursor position.
//! Columns are counted in characters, lines from zero.

use serde::{Deserialize, Serialize};

/// Zero-based cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Half-open character range in the edited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Empty range at a single position.
    pub fn collapsed(position: Position) -> Self {
        Range {
            start: position,
            end: position,
        }
    }

    /// Range spanning columns on one line.
    pub fn on_line(line: u32, start: usize, end: usize) -> Self {
        Range {
            start: Position::new(line, start as u32),
            end: Position::new(line, end as u32),
        }
    }
}

/// A word found on a line, with its character-column span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    pub word: String,
}

/// Identifier characters of the dialect.
pub fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// The requested line, if the position is inside the text at all.
pub fn line_at(text: &str, line: u32) -> Option<&str> {
    text.lines().nth(line as usize)
}

/// The (possibly empty) word ending exactly at `character`.
pub fn word_until(chars: &[char], character: usize) -> WordSpan {
    let end = character.min(chars.len());
    let mut start = end;
    while start > 0 && is_ident_char(chars[start - 1]) {
        start -= 1;
    }
    WordSpan {
        start,
        end,
        word: chars[start..end].iter().collect(),
    }
}

/// The word under or immediately before the cursor, like an editor's
/// word-at-position query. `None` when the cursor touches no word.
pub fn word_at(chars: &[char], character: usize) -> Option<WordSpan> {
    let len = chars.len();
    let anchor = if character < len && is_ident_char(chars[character]) {
        character
    } else if character > 0 && character <= len && is_ident_char(chars[character - 1]) {
        character - 1
    } else {
        return None;
    };
    let mut start = anchor;
    while start > 0 && is_ident_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < len && is_ident_char(chars[end]) {
        end += 1;
    }
    Some(WordSpan {
        start,
        end,
        word: chars[start..end].iter().collect(),
    })
}

/// Walk left from `word_start` across consecutive dot-joined identifiers and
/// return the column where the chain begins.
pub fn chain_start(chars: &[char], word_start: usize) -> usize {
    let mut start = word_start;
    while start > 0 && chars[start - 1] == '.' {
        let previous = word_until(chars, start - 1);
        if previous.word.is_empty() {
            break;
        }
        start = previous.start;
    }
    start
}

/// The full dotted chain ending at `end`, starting at [`chain_start`].
pub fn chain_text(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end.min(chars.len())].iter().collect()
}
