use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Completion backend. `None` when no API key is configured: extraction and
    /// display keep working, analyses report the missing credential.
    pub llm: Option<Arc<dyn CompletionBackend>>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, llm: Option<Arc<dyn CompletionBackend>>) -> Self {
        let sessions = SessionStore::new(config.session_idle_timeout)
            .with_max_sessions(config.max_sessions);
        Self {
            config,
            llm,
            sessions,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.llm.is_some()
    }
}
