//! Host-facing editor intelligence engine for GLua
//!
//! This crate wires the symbol repository, the wiki ingestion loader and the
//! context resolver into one engine the surrounding application talks to.
//! The transport to the host (the game's editor widget) is an external
//! collaborator; everything here is plain in-process calls.

pub mod engine;
pub mod runtime;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use engine::IntelEngine;
pub use runtime::{ClientReport, RuntimeValue};

// Re-export the pieces hosts interact with directly.
pub use glua_resolve::{CompletionContext, CompletionList, HoverResult, Position, Range};
pub use glua_symbols::{CompletionItem, CompletionItemKind, Symbol, SymbolKind, SymbolRepository};
pub use glua_wiki::{IngestStats, LoaderConfig, WikiError, WikiFetcher, WIKI_DUMP_URL};

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
