//! Mode Controller: decides whether a mode is served from its slot, blocked,
//! or computed through the completion backend.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::prompts::{build_prompt, PromptInputs};
use crate::llm_client::CompletionBackend;
use crate::models::{AnalysisMode, Notice};
use crate::session::SessionStore;

pub const UPLOAD_FIRST_WARNING: &str = "Please upload the resume";
pub const MATCH_FIRST_WARNING: &str = "Please complete the 'Percentage Match' analysis first.";
pub const MISSING_KEY_ERROR: &str = "Google API key is missing! Please check your .env file.";

/// Result of running one mode against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeOutcome {
    /// Slot was already Present; no call was made.
    Cached(String),
    /// Fresh completion, now stored in the slot.
    Computed(String),
    /// A precondition failed; no call was made.
    Blocked(Notice),
    /// No credential configured; no call was made.
    Unavailable(Notice),
    /// The call failed; the slot was left as it was.
    Failed(Notice),
}

impl ModeOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            ModeOutcome::Cached(text) | ModeOutcome::Computed(text) => Some(text),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            ModeOutcome::Blocked(n) | ModeOutcome::Unavailable(n) | ModeOutcome::Failed(n) => {
                Some(n)
            }
            _ => None,
        }
    }
}

/// What the controller needs from the session, copied out so the lock is not
/// held while the backend call is in flight.
struct Snapshot {
    resume_text: String,
    cached: Option<String>,
    percentage_match: Option<String>,
}

/// Runs `mode` for session `id` with the job description currently in the form.
pub async fn run_mode(
    sessions: &SessionStore,
    id: Uuid,
    mode: AnalysisMode,
    job_description: &str,
    backend: Option<&dyn CompletionBackend>,
) -> ModeOutcome {
    let snapshot = sessions
        .update(id, |session| {
            session.active_mode = mode;
            session.job_description = job_description.to_string();
            session.document.as_ref().map(|doc| Snapshot {
                resume_text: doc.text().to_string(),
                cached: session.slots.get(mode).map(String::from),
                percentage_match: session
                    .slots
                    .get(AnalysisMode::PercentageMatch)
                    .map(String::from),
            })
        })
        .await
        .flatten();

    let Some(snapshot) = snapshot else {
        return ModeOutcome::Blocked(Notice::warning(UPLOAD_FIRST_WARNING));
    };

    if let Some(text) = snapshot.cached {
        return ModeOutcome::Cached(text);
    }

    if mode == AnalysisMode::Improvisation && snapshot.percentage_match.is_none() {
        warn!("Session {id}: Improvisation requested before Percentage Match");
        return ModeOutcome::Blocked(Notice::warning(MATCH_FIRST_WARNING));
    }

    let Some(backend) = backend else {
        return ModeOutcome::Unavailable(Notice::error(MISSING_KEY_ERROR));
    };

    let prompt = build_prompt(
        mode,
        &PromptInputs {
            resume_text: &snapshot.resume_text,
            job_description,
            percentage_match: snapshot.percentage_match.as_deref(),
        },
    );

    match backend.complete(&prompt).await {
        Ok(text) => {
            // A concurrent request may have filled the slot meanwhile; first write wins.
            let stored = sessions
                .update(id, |session| {
                    session.slots.fill(mode, text.clone());
                    session.slots.get(mode).map(String::from)
                })
                .await
                .flatten()
                .unwrap_or(text);
            info!(
                "Session {id}: {} computed with {}",
                mode.label(),
                backend.model()
            );
            ModeOutcome::Computed(stored)
        }
        Err(e) => {
            error!("Session {id}: {} failed: {e}", mode.label());
            ModeOutcome::Failed(Notice::error(format!(
                "An error occurred while generating response: {e}"
            )))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::document::{Extraction, UploadedDocument};
    use crate::llm_client::LlmError;
    use crate::session::StoredDocument;

    /// Backend that records every prompt and answers from a fixed script.
    pub struct StubBackend {
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
        reply: Result<String, String>,
    }

    impl StubBackend {
        pub fn replying(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                reply: Ok(text.to_string()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                reply: Err(message.to_string()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl CompletionBackend for StubBackend {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|message| LlmError::Api {
                status: 503,
                message,
            })
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    async fn session_with_resume(text: &str) -> (SessionStore, Uuid) {
        let sessions = SessionStore::new(Duration::from_secs(60));
        let (id, _) = sessions.resolve(None).await;
        let document =
            UploadedDocument::new(Some("cv.pdf"), Some("application/pdf"), Bytes::new()).unwrap();
        let stored = StoredDocument {
            document,
            extraction: Extraction {
                text: text.to_string(),
                ..Extraction::default()
            },
        };
        sessions.update(id, |s| s.document = Some(stored)).await;
        (sessions, id)
    }

    async fn slot(sessions: &SessionStore, id: Uuid, mode: AnalysisMode) -> Option<String> {
        sessions
            .read(id, |s| s.slots.get(mode).map(String::from))
            .await
            .flatten()
    }

    #[tokio::test]
    async fn test_resume_analysis_calls_backend_once_and_fills_slot() {
        let (sessions, id) = session_with_resume("Jane Doe, Software Engineer").await;
        let backend = StubBackend::replying("Strong candidate.");

        let outcome = run_mode(
            &sessions,
            id,
            AnalysisMode::ResumeAnalysis,
            "Looking for a Software Engineer",
            Some(&backend),
        )
        .await;

        assert_eq!(outcome, ModeOutcome::Computed("Strong candidate.".to_string()));
        assert_eq!(backend.call_count(), 1);
        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("Jane Doe, Software Engineer"));
        assert!(prompt.contains("Looking for a Software Engineer"));
        assert_eq!(
            slot(&sessions, id, AnalysisMode::ResumeAnalysis).await.as_deref(),
            Some("Strong candidate.")
        );
    }

    #[tokio::test]
    async fn test_present_slot_is_redisplayed_without_a_call() {
        let (sessions, id) = session_with_resume("resume").await;
        let backend = StubBackend::replying("first answer");

        run_mode(&sessions, id, AnalysisMode::PercentageMatch, "jd", Some(&backend)).await;
        let again = run_mode(
            &sessions,
            id,
            AnalysisMode::PercentageMatch,
            "a different jd",
            Some(&backend),
        )
        .await;

        assert_eq!(again, ModeOutcome::Cached("first answer".to_string()));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_improvisation_before_match_is_blocked() {
        let (sessions, id) = session_with_resume("resume").await;
        let backend = StubBackend::replying("unused");

        let outcome =
            run_mode(&sessions, id, AnalysisMode::Improvisation, "jd", Some(&backend)).await;

        assert_eq!(
            outcome,
            ModeOutcome::Blocked(Notice::warning(MATCH_FIRST_WARNING))
        );
        assert_eq!(backend.call_count(), 0);
        assert_eq!(slot(&sessions, id, AnalysisMode::Improvisation).await, None);
    }

    #[tokio::test]
    async fn test_improvisation_prompt_contains_cached_match() {
        let (sessions, id) = session_with_resume("resume").await;
        let matcher = StubBackend::replying("Match: 64%\nMissing: Terraform");
        run_mode(&sessions, id, AnalysisMode::PercentageMatch, "jd", Some(&matcher)).await;

        let advisor = StubBackend::replying("Learn Terraform.");
        let outcome =
            run_mode(&sessions, id, AnalysisMode::Improvisation, "jd", Some(&advisor)).await;

        assert_eq!(outcome, ModeOutcome::Computed("Learn Terraform.".to_string()));
        assert!(advisor
            .last_prompt()
            .unwrap()
            .contains("Match: 64%\nMissing: Terraform"));
    }

    #[tokio::test]
    async fn test_failed_call_leaves_slot_absent() {
        let (sessions, id) = session_with_resume("resume").await;
        let backend = StubBackend::failing("upstream unavailable");

        let outcome =
            run_mode(&sessions, id, AnalysisMode::ResumeAnalysis, "jd", Some(&backend)).await;

        let notice = outcome.notice().unwrap();
        assert!(notice
            .message
            .starts_with("An error occurred while generating response:"));
        assert!(notice.message.contains("upstream unavailable"));
        assert_eq!(slot(&sessions, id, AnalysisMode::ResumeAnalysis).await, None);

        // A later success still fills the slot.
        let retry = StubBackend::replying("ok now");
        let outcome =
            run_mode(&sessions, id, AnalysisMode::ResumeAnalysis, "jd", Some(&retry)).await;
        assert_eq!(outcome.text(), Some("ok now"));
    }

    #[tokio::test]
    async fn test_missing_document_blocks_without_call() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        let (id, _) = sessions.resolve(None).await;
        let backend = StubBackend::replying("unused");

        let outcome =
            run_mode(&sessions, id, AnalysisMode::ResumeAnalysis, "jd", Some(&backend)).await;

        assert_eq!(outcome, ModeOutcome::Blocked(Notice::warning(UPLOAD_FIRST_WARNING)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_backend_is_unavailable() {
        let (sessions, id) = session_with_resume("resume").await;

        let outcome = run_mode(&sessions, id, AnalysisMode::ResumeAnalysis, "jd", None).await;

        assert_eq!(outcome, ModeOutcome::Unavailable(Notice::error(MISSING_KEY_ERROR)));
    }

    #[tokio::test]
    async fn test_mode_and_job_description_are_recorded() {
        let (sessions, id) = session_with_resume("resume").await;

        run_mode(&sessions, id, AnalysisMode::PercentageMatch, "Rust role", None).await;

        let (mode, jd) = sessions
            .read(id, |s| (s.active_mode, s.job_description.clone()))
            .await
            .unwrap();
        assert_eq!(mode, AnalysisMode::PercentageMatch);
        assert_eq!(jd, "Rust role");
    }
}
