//! Hover resolution
//!
//! Reconstructs the dotted chain under the cursor and returns the matching
//! symbol's documentation. Colon-called bare names may match several owners;
//! all candidates' documentation is concatenated rather than collapsed.

use serde::{Deserialize, Serialize};

use glua_symbols::SymbolRepository;

use crate::text::{chain_start, chain_text, line_at, word_at, Position, Range};

/// Documentation for the hovered position. Always well-formed; a lookup miss
/// is an empty `contents`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverResult {
    /// Ordered markdown blocks.
    pub contents: Vec<String>,
    pub range: Range,
}

impl HoverResult {
    fn empty(range: Range) -> Self {
        HoverResult {
            contents: Vec::new(),
            range,
        }
    }
}

/// Resolve hover documentation at `position`.
pub fn resolve_hover(repository: &SymbolRepository, text: &str, position: Position) -> HoverResult {
    let Some(line) = line_at(text, position.line) else {
        return HoverResult::empty(Range::collapsed(position));
    };
    let chars: Vec<char> = line.chars().collect();
    let Some(word) = word_at(&chars, position.character as usize) else {
        return HoverResult::empty(Range::collapsed(position));
    };
    let word_range = Range::on_line(position.line, word.start, word.end);

    if word.start > 0 && chars[word.start - 1] == ':' {
        let candidates = repository.lookup_bare(&word.word);
        if !candidates.is_empty() {
            let contents = candidates
                .iter()
                .flat_map(|symbol| symbol.render_documentation())
                .collect();
            return HoverResult {
                contents,
                range: word_range,
            };
        }
    }

    let start = chain_start(&chars, word.start);
    let chain = chain_text(&chars, start, word.end);
    match repository.lookup(&chain) {
        Some(symbol) => HoverResult {
            contents: symbol.render_documentation(),
            range: Range::on_line(position.line, start, word.end),
        },
        None => HoverResult::empty(word_range),
    }
}
