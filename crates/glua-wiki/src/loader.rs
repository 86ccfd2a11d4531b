//! Background loading of the wiki dump
//!
//! The dump comes from the environment through the [`WikiFetcher`]
//! capability. Fetching is the only latency-bearing operation in the whole
//! system: it runs once, in the background, with a bounded retry budget and
//! a single outstanding attempt no matter how many ingestion requests are
//! queued behind it. Once the budget is spent the loader is terminal for the
//! session and documented built-ins simply stay absent.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use glua_symbols::SymbolRepository;

use crate::normalize::{ingest, IngestStats};
use crate::raw::{parse_dump, RawElement};
use crate::WikiError;

/// Where hosts usually fetch the dump from.
pub const WIKI_DUMP_URL: &str = "https://metastruct.github.io/gmod-wiki-scraper/gwiki.json";

/// Environment-provided fetch capability for the raw dump text.
#[async_trait]
pub trait WikiFetcher: Send + Sync {
    async fn fetch(&self) -> Result<String, WikiError>;
}

/// Loader tuning.
#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    /// Fetch attempts before the loader goes terminal.
    pub max_attempts: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig { max_attempts: 3 }
    }
}

enum DumpState {
    /// Nothing fetched yet.
    Idle,
    /// Decoded dump, shared by every ingestion.
    Loaded(Arc<Vec<RawElement>>),
    /// Retry budget spent.
    Exhausted,
}

/// Owns the dump cache and the fetch lifecycle.
pub struct WikiLoader {
    fetcher: Arc<dyn WikiFetcher>,
    config: LoaderConfig,
    state: Mutex<DumpState>,
}

impl fmt::Debug for WikiLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WikiLoader {
    pub fn new(fetcher: Arc<dyn WikiFetcher>) -> Self {
        WikiLoader::with_config(fetcher, LoaderConfig::default())
    }

    pub fn with_config(fetcher: Arc<dyn WikiFetcher>, config: LoaderConfig) -> Self {
        WikiLoader {
            fetcher,
            config,
            state: Mutex::new(DumpState::Idle),
        }
    }

    /// The decoded dump, fetching it first if this is the first caller.
    ///
    /// The async mutex is held across the fetch, so concurrent callers wait
    /// on the in-flight attempt instead of starting their own.
    pub async fn ensure_loaded(&self) -> Result<Arc<Vec<RawElement>>, WikiError> {
        let mut state = self.state.lock().await;
        match &*state {
            DumpState::Loaded(elements) => return Ok(Arc::clone(elements)),
            DumpState::Exhausted => {
                return Err(WikiError::AttemptsExhausted {
                    attempts: self.config.max_attempts,
                })
            }
            DumpState::Idle => {}
        }
        for attempt in 1..=self.config.max_attempts {
            match self.try_fetch().await {
                Ok(elements) => {
                    info!(elements = elements.len(), "wiki dump loaded");
                    let elements = Arc::new(elements);
                    *state = DumpState::Loaded(Arc::clone(&elements));
                    return Ok(elements);
                }
                Err(error) => {
                    warn!(attempt, %error, "wiki dump fetch attempt failed");
                }
            }
        }
        *state = DumpState::Exhausted;
        Err(WikiError::AttemptsExhausted {
            attempts: self.config.max_attempts,
        })
    }

    async fn try_fetch(&self) -> Result<Vec<RawElement>, WikiError> {
        let body = self.fetcher.fetch().await?;
        parse_dump(&body)
    }

    /// Ingest the dump for one realm, fetching first when necessary. An
    /// ingestion request arriving before the data is available simply awaits
    /// the shared fetch; it never blocks resolution, which keeps serving
    /// whatever the repository holds right now.
    pub async fn load_realm(
        &self,
        realm: &str,
        repository: &mut SymbolRepository,
    ) -> Result<IngestStats, WikiError> {
        let elements = self.ensure_loaded().await?;
        Ok(ingest(&elements, realm, repository))
    }
}
