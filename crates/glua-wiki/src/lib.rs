//! Wiki documentation ingestion for GLua editor intelligence
//!
//! The community wiki dump is a large JSON array with wildly inconsistent
//! shapes: singular-or-plural fields, string-or-object descriptions,
//! arbitrarily nested enum groups. This crate decodes it with explicit
//! coercion types ([`raw`]), normalizes it into canonical symbol records
//! ([`normalize`]) and fetches it in the background with bounded retries and
//! in-flight deduplication ([`loader`]).

pub mod loader;
pub mod normalize;
pub mod raw;

use thiserror::Error;

/// Errors of the ingestion pipeline. Resolution never surfaces these; only
/// explicit load requests observe them.
#[derive(Debug, Error)]
pub enum WikiError {
    /// The environment-provided fetch failed.
    #[error("wiki dump fetch failed: {0}")]
    Fetch(String),

    /// The fetched document was not a decodable dump.
    #[error("wiki dump decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The retry budget is spent; documented built-ins stay absent for the
    /// rest of the session.
    #[error("wiki dump unavailable after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

pub use loader::{LoaderConfig, WikiFetcher, WikiLoader, WIKI_DUMP_URL};
pub use normalize::{ingest, IngestStats};
pub use raw::{parse_dump, RawElement};
