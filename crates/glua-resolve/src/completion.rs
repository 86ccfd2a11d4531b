//! Completion context classification
//!
//! The resolver classifies the lexical context around the cursor with a
//! fixed-priority rule chain, then hands back the matching repository list
//! with a replacement range. It never fails: unknown or malformed positions
//! produce an empty, well-formed list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use glua_symbols::{CompletionItem, CompletionItemKind, SymbolRepository};

use crate::text::{chain_start, chain_text, line_at, word_until, Position, Range};

/// Chain that starts a hook registration (`hook.Add("Think", ...)`).
pub const HOOK_REGISTRATION_CHAIN: &str = "hook.Add";

/// Chain reading the hook table; shares the base library with registration
/// but must not trigger hook-name literals.
pub const HOOK_TABLE_ACCESSOR_CHAIN: &str = "hook.GetTable";

/// Keyword introducing a local declaration.
pub const DECLARATION_KEYWORD: &str = "local";

/// Snippet offered alongside `function` after the declaration keyword.
pub const FUNCTION_SNIPPET_NAME: &str = "fun";

/// How the cursor context was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionContext {
    /// After `:`, in colon-call scope.
    Method,
    /// After `.` with a known namespace prefix.
    Qualified,
    /// Inside a hook registration's first argument.
    HookLiteral,
    /// Right after the local-declaration keyword.
    Declaration,
    /// After `.` on an unrecognized value; members cannot be resolved.
    UnresolvedMember,
    /// Anywhere else.
    Global,
}

/// A classified completion result.
#[derive(Debug, Clone)]
pub struct CompletionList {
    pub items: Arc<Vec<CompletionItem>>,
    /// Text span the editor should replace with the chosen insert text.
    pub replace_range: Range,
    pub context: CompletionContext,
}

impl CompletionList {
    fn empty(context: CompletionContext, range: Range) -> Self {
        CompletionList {
            items: Arc::new(Vec::new()),
            replace_range: range,
            context,
        }
    }
}

/// Classify the context at `position` and return the candidate set.
pub fn resolve_completion(
    repository: &SymbolRepository,
    text: &str,
    position: Position,
) -> CompletionList {
    let Some(line) = line_at(text, position.line) else {
        return CompletionList::empty(CompletionContext::Global, Range::collapsed(position));
    };
    let chars: Vec<char> = line.chars().collect();
    let character = (position.character as usize).min(chars.len());
    let current = word_until(&chars, character);
    let word_range = Range::on_line(position.line, current.start, character);
    let preceding = current.start.checked_sub(1).map(|idx| chars[idx]);
    trace!(?preceding, word = %current.word, "classifying completion context");

    match preceding {
        Some(':') => CompletionList {
            items: repository.method_items(),
            replace_range: word_range,
            context: CompletionContext::Method,
        },
        Some('.') => {
            let start = chain_start(&chars, current.start);
            let chain = chain_text(&chars, start, character);
            let leading = chain.split('.').next().unwrap_or("");
            if !leading.is_empty() && repository.is_module(leading) {
                CompletionList {
                    items: repository.global_items(),
                    replace_range: Range::on_line(position.line, start, character),
                    context: CompletionContext::Qualified,
                }
            } else {
                CompletionList::empty(CompletionContext::UnresolvedMember, word_range)
            }
        }
        Some(trigger @ ('(' | '"' | '\''))
            if is_hook_registration(&chars, current.start - 1, trigger) =>
        {
            CompletionList {
                items: Arc::new(repository.hook_items(trigger == '(')),
                replace_range: word_range,
                context: CompletionContext::HookLiteral,
            }
        }
        _ => {
            if preceding_word_is(&chars, current.start, DECLARATION_KEYWORD) {
                CompletionList {
                    items: Arc::new(declaration_items(repository)),
                    replace_range: word_range,
                    context: CompletionContext::Declaration,
                }
            } else {
                CompletionList {
                    items: repository.global_items(),
                    replace_range: word_range,
                    context: CompletionContext::Global,
                }
            }
        }
    }
}

/// Whether the call the cursor sits in is the hook registration call (and
/// not the hook-table accessor). For quote triggers the opening paren must
/// already be present to the left.
fn is_hook_registration(chars: &[char], trigger_idx: usize, trigger: char) -> bool {
    let mut idx = trigger_idx;
    if trigger != '(' {
        while idx > 0 && chars[idx - 1].is_whitespace() {
            idx -= 1;
        }
        if idx == 0 || chars[idx - 1] != '(' {
            return false;
        }
        idx -= 1;
    }
    while idx > 0 && chars[idx - 1].is_whitespace() {
        idx -= 1;
    }
    let callee = word_until(chars, idx);
    if callee.word.is_empty() {
        return false;
    }
    let start = chain_start(chars, callee.start);
    let chain = chain_text(chars, start, callee.end);
    chain == HOOK_REGISTRATION_CHAIN && chain != HOOK_TABLE_ACCESSOR_CHAIN
}

/// Whether the word immediately before the current one (whitespace apart)
/// is `expected`.
fn preceding_word_is(chars: &[char], word_start: usize, expected: &str) -> bool {
    let mut idx = word_start;
    while idx > 0 && chars[idx - 1].is_whitespace() {
        idx -= 1;
    }
    if idx == word_start {
        // No separating whitespace means no preceding word on this spot.
        return false;
    }
    word_until(chars, idx).word == expected
}

/// The declaration context offers exactly the `function` keyword and the
/// function-declaration snippet.
fn declaration_items(repository: &SymbolRepository) -> Vec<CompletionItem> {
    let mut items = vec![CompletionItem::plain("function", CompletionItemKind::Keyword)];
    if let Some(snippet) = repository.find_snippet(FUNCTION_SNIPPET_NAME) {
        items.push(CompletionItem::snippet(snippet));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use glua_symbols::{Symbol, SymbolKind, GAMEMODE_OWNER};

    fn repo() -> SymbolRepository {
        let mut repo = SymbolRepository::new();
        repo.add(Symbol::module("util"));
        repo.add(Symbol::function(
            SymbolKind::GlobalFunction,
            "TableToJSON",
            Some("util".to_owned()),
        ));
        repo.add(Symbol::function(
            SymbolKind::ClassMethod,
            "SetPos",
            Some("Entity".to_owned()),
        ));
        repo.add(Symbol::function(
            SymbolKind::Hook,
            "Think",
            Some(GAMEMODE_OWNER.to_owned()),
        ));
        repo.add(Symbol::function(
            SymbolKind::Hook,
            "PaintOver",
            Some("PANEL".to_owned()),
        ));
        repo
    }

    fn resolve(repo: &SymbolRepository, line: &str, character: u32) -> CompletionList {
        resolve_completion(repo, line, Position::new(0, character))
    }

    #[test]
    fn colon_switches_to_method_scope() {
        let repo = repo();
        let list = resolve(&repo, "ent:Set", 7);
        assert_eq!(list.context, CompletionContext::Method);
        assert!(list.items.iter().any(|item| item.label == "Entity:SetPos"));
        assert_eq!(list.replace_range, Range::on_line(0, 4, 7));
    }

    #[test]
    fn known_module_prefix_widens_the_replace_range() {
        let repo = repo();
        let list = resolve(&repo, "util.Tab", 8);
        assert_eq!(list.context, CompletionContext::Qualified);
        assert_eq!(list.replace_range, Range::on_line(0, 0, 8));
        assert!(list.items.iter().any(|item| item.label == "util.TableToJSON"));
    }

    #[test]
    fn unknown_prefix_yields_an_empty_member_list() {
        let repo = repo();
        let list = resolve(&repo, "myvar.fie", 9);
        assert_eq!(list.context, CompletionContext::UnresolvedMember);
        assert!(list.items.is_empty());
    }

    #[test]
    fn hook_registration_paren_offers_quoted_literals() {
        let repo = repo();
        let list = resolve(&repo, "hook.Add(", 9);
        assert_eq!(list.context, CompletionContext::HookLiteral);
        let labels: Vec<_> = list.items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["\"Think\""]);
        assert_eq!(list.items[0].insert_text, "\"Think\"");
    }

    #[test]
    fn hook_registration_inside_quote_skips_requoting() {
        let repo = repo();
        let list = resolve(&repo, "hook.Add(\"Th", 12);
        assert_eq!(list.context, CompletionContext::HookLiteral);
        assert_eq!(list.items[0].insert_text, "Think");
    }

    #[test]
    fn hook_table_accessor_falls_through_to_global() {
        let repo = repo();
        let list = resolve(&repo, "hook.GetTable(", 14);
        assert_eq!(list.context, CompletionContext::Global);
    }

    #[test]
    fn unrelated_add_calls_do_not_trigger_hook_literals() {
        let repo = repo();
        let list = resolve(&repo, "timer.Add(", 10);
        assert_eq!(list.context, CompletionContext::Global);
    }

    #[test]
    fn local_offers_function_keyword_and_snippet() {
        let repo = repo();
        let list = resolve(&repo, "local fu", 8);
        assert_eq!(list.context, CompletionContext::Declaration);
        let labels: Vec<_> = list.items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["function", "fun"]);
    }

    #[test]
    fn default_context_returns_the_global_list() {
        let repo = repo();
        let list = resolve(&repo, "pri", 3);
        assert_eq!(list.context, CompletionContext::Global);
        assert!(list.items.iter().any(|item| item.label == "util.TableToJSON"));
        assert!(list.items.iter().any(|item| item.label == "util"));
    }

    #[test]
    fn awkward_cursor_positions_do_not_fault() {
        let repo = repo();
        assert_eq!(resolve(&repo, "", 0).context, CompletionContext::Global);
        assert_eq!(resolve(&repo, "   ", 2).context, CompletionContext::Global);
        assert_eq!(resolve(&repo, ".", 1).context, CompletionContext::UnresolvedMember);
        // Position past the end of the line clamps.
        assert_eq!(resolve(&repo, "x", 40).context, CompletionContext::Global);
        // Position past the last line yields an empty well-formed list.
        let list = resolve_completion(&repo, "x", Position::new(9, 0));
        assert!(list.items.is_empty());
    }
}
