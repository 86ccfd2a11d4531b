//! Symbol database for GLua editor intelligence
//!
//! This crate holds the canonical symbol records (built-in documentation and
//! runtime-discovered values) and the repository that indexes them for
//! completion and hover resolution. Derived completion lists are cached and
//! rebuilt lazily after mutation.

pub mod completion;
pub mod repository;
pub mod symbol;

pub use completion::{CompletionItem, CompletionItemKind};
pub use repository::{SymbolRepository, BUILTIN_CONSTANTS, BUILTIN_SNIPPETS, KEYWORDS};
pub use symbol::{
    Argument, Description, Example, ReturnValue, Symbol, SymbolKind, GAMEMODE_OWNER, GLOBAL_OWNER,
};
