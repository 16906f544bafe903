use std::sync::Arc;

use crate::analysis::session::SessionStore;
use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model seam. `LlmClient` in production, a scripted generator in tests.
    pub generator: Arc<dyn TextGenerator>,
    pub sessions: SessionStore,
    pub config: Config,
}
