//! The engine facade
//!
//! One instance per editing session. The repository lives behind a lock and
//! "reset" swaps in a fresh instance instead of clearing in place, so no
//! half-cleared state is ever observable. Completion and hover requests are
//! serviced from whatever the repository holds at that moment; they never
//! wait for the background wiki fetch.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use glua_resolve::{CompletionList, HoverResult, Position};
use glua_symbols::SymbolRepository;
use glua_wiki::normalize::{ingest, IngestStats};
use glua_wiki::{LoaderConfig, WikiError, WikiFetcher, WikiLoader};

use crate::runtime::{ClientReport, RuntimeValue};

/// Editor intelligence engine: symbol database plus resolution entry points.
#[derive(Debug)]
pub struct IntelEngine {
    /// Current repository; replaced wholesale on [`IntelEngine::reset`].
    pub repository: RwLock<SymbolRepository>,
    /// Wiki dump loader shared by every ingestion request.
    pub loader: WikiLoader,
}

impl IntelEngine {
    pub fn new(fetcher: Arc<dyn WikiFetcher>) -> Self {
        IntelEngine::with_config(fetcher, LoaderConfig::default())
    }

    pub fn with_config(fetcher: Arc<dyn WikiFetcher>, config: LoaderConfig) -> Self {
        IntelEngine {
            repository: RwLock::new(SymbolRepository::new()),
            loader: WikiLoader::with_config(fetcher, config),
        }
    }

    /// Ingest documented built-ins for one realm. Resolves once the
    /// repository reflects that realm; concurrent calls share one fetch.
    pub async fn load_documentation_state(&self, realm: &str) -> Result<IngestStats, WikiError> {
        let elements = self.loader.ensure_loaded().await?;
        let mut repository = self.repository.write();
        Ok(ingest(&elements, realm, &mut repository))
    }

    /// Discard all symbol state and start from a fresh repository.
    pub fn reset(&self) {
        debug!("resetting symbol repository");
        *self.repository.write() = SymbolRepository::new();
    }

    /// Add one runtime-reported value.
    pub fn add_symbol(&self, record: RuntimeValue) {
        self.repository.write().add(record.into_symbol());
    }

    /// Add a batch of runtime-reported values.
    pub fn add_symbols(&self, records: Vec<RuntimeValue>) {
        let mut repository = self.repository.write();
        for record in records {
            repository.add(record.into_symbol());
        }
    }

    /// Bulk-import the client's pipe-separated globals report.
    pub fn apply_client_report(&self, report: &ClientReport) {
        let mut repository = self.repository.write();
        report.apply(&mut repository);
    }

    /// Register a user-defined completion snippet.
    pub fn register_snippet(&self, name: impl Into<String>, template: impl Into<String>) {
        self.repository.write().register_snippet(name, template);
    }

    /// Classify the completion context at `position` and return candidates.
    pub fn resolve_completion(&self, text: &str, position: Position) -> CompletionList {
        let repository = self.repository.read();
        glua_resolve::resolve_completion(&repository, text, position)
    }

    /// Resolve hover documentation at `position`.
    pub fn resolve_hover(&self, text: &str, position: Position) -> HoverResult {
        let repository = self.repository.read();
        glua_resolve::resolve_hover(&repository, text, position)
    }
}
