//! Session State Store: per-browser context held in memory.
//!
//! Sessions are keyed by a random UUID carried in the `ats_session` cookie.
//! Nothing here is persisted; idle sessions are dropped on the next access.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::document::{Extraction, UploadedDocument};
use crate::models::{AnalysisMode, Notice};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "ats_session";
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// The three result slots. Each is Absent (`None`) until its mode succeeds
/// once, then stays Present for the life of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisSlots {
    resume_analysis: Option<String>,
    percentage_match: Option<String>,
    improvisation: Option<String>,
}

impl AnalysisSlots {
    pub fn get(&self, mode: AnalysisMode) -> Option<&str> {
        self.slot(mode).as_deref()
    }

    /// Stores `text` if the slot is still Absent. Returns false (and keeps the
    /// existing text) when it was already Present.
    pub fn fill(&mut self, mode: AnalysisMode, text: String) -> bool {
        let slot = self.slot_mut(mode);
        if slot.is_some() {
            return false;
        }
        *slot = Some(text);
        true
    }

    /// Present slots in mode order.
    pub fn present(&self) -> impl Iterator<Item = (AnalysisMode, &str)> + '_ {
        AnalysisMode::ALL
            .into_iter()
            .filter_map(move |mode| self.get(mode).map(|text| (mode, text)))
    }

    fn slot(&self, mode: AnalysisMode) -> &Option<String> {
        match mode {
            AnalysisMode::ResumeAnalysis => &self.resume_analysis,
            AnalysisMode::PercentageMatch => &self.percentage_match,
            AnalysisMode::Improvisation => &self.improvisation,
        }
    }

    fn slot_mut(&mut self, mode: AnalysisMode) -> &mut Option<String> {
        match mode {
            AnalysisMode::ResumeAnalysis => &mut self.resume_analysis,
            AnalysisMode::PercentageMatch => &mut self.percentage_match,
            AnalysisMode::Improvisation => &mut self.improvisation,
        }
    }
}

/// An uploaded resume together with what was extracted from it.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub document: UploadedDocument,
    pub extraction: Extraction,
}

impl StoredDocument {
    pub fn text(&self) -> &str {
        &self.extraction.text
    }

    /// Extraction problems, shown on every render while this document is loaded.
    pub fn notices(&self) -> &[Notice] {
        &self.extraction.notices
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub document: Option<StoredDocument>,
    pub job_description: String,
    pub active_mode: AnalysisMode,
    pub slots: AnalysisSlots,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            document: None,
            job_description: String::new(),
            active_mode: AnalysisMode::default(),
            slots: AnalysisSlots::default(),
            last_seen: Instant::now(),
        }
    }
}

/// In-memory session map shared by all handlers.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Caps the number of live sessions. At the cap, creating a session
    /// evicts the one seen least recently.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Returns the live session for `requested`, creating a fresh one when the
    /// id is missing, unknown or expired. The bool is true for a new session.
    pub async fn resolve(&self, requested: Option<Uuid>) -> (Uuid, bool) {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_seen) < self.idle_timeout);
        if sessions.len() < before {
            debug!("Purged {} idle sessions", before - sessions.len());
        }

        if let Some(id) = requested {
            if let Some(session) = sessions.get_mut(&id) {
                session.last_seen = now;
                return (id, false);
            }
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    info!("Session {oldest} evicted (limit of {} reached)", self.max_sessions);
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Session::new());
        info!("Session {id} created ({} active)", sessions.len());
        (id, true)
    }

    /// Runs `f` against a snapshot borrow of the session, if it exists.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> Option<T> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(f)
    }

    /// Runs `f` with exclusive access to the session, if it exists.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(f)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// The session a request belongs to. Resolving never fails: a request without
/// a valid cookie gets a new session, and `is_new` tells the response to set it.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    pub id: Uuid,
    pub is_new: bool,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requested = session_id_from_headers(&parts.headers);
        let (id, is_new) = state.sessions.resolve(requested).await;
        Ok(SessionContext { id, is_new })
    }
}

/// Reads the session id from the request's `Cookie` header(s).
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a newly created session.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
