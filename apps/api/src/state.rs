use std::sync::Arc;

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::interview::knowledge::KnowledgeBase;
use crate::llm_client::ChatBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide credential and active-model preference. The only mutable
    /// state shared across requests; see `CredentialStore` for the race rules.
    pub credentials: Arc<CredentialStore>,
    /// Pluggable chat backend. Production wiring injects `GeminiClient`;
    /// tests swap in mocks.
    pub backend: Arc<dyn ChatBackend>,
    /// Static knowledge base, parsed once at startup.
    pub knowledge: Arc<KnowledgeBase>,
    pub config: Config,
}
