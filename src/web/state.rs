//! Application state shared across all route handlers.

use crate::catalog::CatalogLoader;
use crate::config::AppConfig;
use crate::error::Result;
use crate::llm::broker::LlmBroker;
use crate::llm::gateway::LlmGateway;
use crate::web::render::PageRenderer;
use crate::web::sessions::SessionStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state.
///
/// The catalog is shared read-only; visitor chats live in the session store.
#[derive(Clone)]
pub struct AppState {
    pub catalog_path: Arc<PathBuf>,
    pub catalogs: Arc<CatalogLoader>,
    pub broker: LlmBroker,
    pub sessions: SessionStore,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: &AppConfig, gateway: Arc<dyn LlmGateway>) -> Result<Self> {
        Ok(Self {
            catalog_path: Arc::new(config.catalog_path.clone()),
            catalogs: Arc::new(CatalogLoader::new()),
            broker: LlmBroker::new(config.model.clone(), gateway),
            sessions: SessionStore::new(config.selection_policy, config.session_ttl),
            pages: Arc::new(PageRenderer::new()?),
        })
    }
}
