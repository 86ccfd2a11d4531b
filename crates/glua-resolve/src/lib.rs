//! Context-sensitive resolution for GLua editor intelligence
//!
//! Consumes the symbol repository read-only: given the edited text and a
//! cursor position, classifies the lexical context and produces either a
//! completion candidate list or hover documentation. Resolution is purely
//! textual; there is no parse tree and no type inference over variables.

pub mod completion;
pub mod hover;
pub mod text;

pub use completion::{
    resolve_completion, CompletionContext, CompletionList, DECLARATION_KEYWORD,
    FUNCTION_SNIPPET_NAME, HOOK_REGISTRATION_CHAIN, HOOK_TABLE_ACCESSOR_CHAIN,
};
pub use hover::{resolve_hover, HoverResult};
pub use text::{Position, Range};
