//! Presentation Layer: the single HTML page, rendered with askama.
//!
//! Purely a view over the session: everything shown here is read from the
//! `Session`, the configuration and the outcome of the current request.

use askama::Template;
use axum::{
    http::header,
    response::{AppendHeaders, Html, IntoResponse, Response},
};

use crate::analysis::controller::{ModeOutcome, MISSING_KEY_ERROR, UPLOAD_FIRST_WARNING};
use crate::document::DocumentKind;
use crate::errors::AppError;
use crate::models::{AnalysisMode, Notice};
use crate::session::{session_cookie, Session, SessionContext};

pub const PAGE_TITLE: &str = "Smart ATS";

/// One entry of the horizontal mode selector.
pub struct ModeTab {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Sidebar download link for a Present slot.
pub struct DownloadLink {
    pub slug: &'static str,
    pub label: &'static str,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct AtsPage {
    pub title: &'static str,
    pub notices: Vec<Notice>,
    pub job_description: String,
    pub modes: Vec<ModeTab>,
    pub has_document: bool,
    pub document_name: String,
    pub document_is_pdf: bool,
    pub docx_preview: Vec<String>,
    pub section_title: &'static str,
    pub result_title: &'static str,
    pub has_result: bool,
    pub result_text: String,
    pub downloads: Vec<DownloadLink>,
}

impl AtsPage {
    /// Builds the page for `session`. `outcome` is the result of the mode run
    /// in this request, if any; without one, a Present slot for the active
    /// mode is redisplayed.
    pub fn build(
        session: &Session,
        ai_enabled: bool,
        outcome: Option<&ModeOutcome>,
        extra: Vec<Notice>,
    ) -> Self {
        let mode = session.active_mode;
        let mut notices = Vec::new();

        if !ai_enabled {
            push_unique(&mut notices, Notice::error(MISSING_KEY_ERROR));
        }
        if let Some(doc) = &session.document {
            for notice in doc.notices() {
                push_unique(&mut notices, notice.clone());
            }
        }
        for notice in extra {
            push_unique(&mut notices, notice);
        }
        if let Some(notice) = outcome.and_then(ModeOutcome::notice) {
            push_unique(&mut notices, notice.clone());
        }
        if session.document.is_none() {
            push_unique(&mut notices, Notice::warning(UPLOAD_FIRST_WARNING));
        }

        let result = match outcome {
            Some(outcome) => outcome.text(),
            None => session.slots.get(mode),
        };

        let (document_name, document_is_pdf, docx_preview) = match &session.document {
            Some(stored) => (
                stored.document.file_name.clone(),
                stored.document.kind == DocumentKind::Pdf,
                stored.extraction.preview.clone(),
            ),
            None => (String::new(), false, Vec::new()),
        };

        Self {
            title: PAGE_TITLE,
            notices,
            job_description: session.job_description.clone(),
            modes: AnalysisMode::ALL
                .into_iter()
                .map(|m| ModeTab {
                    slug: m.slug(),
                    label: m.label(),
                    active: m == mode,
                })
                .collect(),
            has_document: session.document.is_some(),
            document_name,
            document_is_pdf,
            docx_preview,
            section_title: mode.section_title(),
            result_title: mode.result_title(),
            has_result: result.is_some(),
            result_text: result.unwrap_or_default().to_string(),
            downloads: session
                .slots
                .present()
                .map(|(m, _)| DownloadLink {
                    slug: m.slug(),
                    label: m.download_label(),
                })
                .collect(),
        }
    }

    /// Renders the page and attaches the session cookie when the session is new.
    pub fn respond(self, session: SessionContext) -> Result<Response, AppError> {
        let html = Html(self.render()?);
        Ok(with_session_cookie(session, html))
    }
}

/// Adds `Set-Cookie` for sessions created during this request.
pub fn with_session_cookie(session: SessionContext, response: impl IntoResponse) -> Response {
    if session.is_new {
        (
            AppendHeaders([(header::SET_COOKIE, session_cookie(session.id))]),
            response,
        )
            .into_response()
    } else {
        response.into_response()
    }
}

fn push_unique(notices: &mut Vec<Notice>, notice: Notice) {
    if !notices.contains(&notice) {
        notices.push(notice);
    }
}

/// Reduces a user-supplied file name to something safe inside a quoted
/// `Content-Disposition` parameter.
pub fn header_safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim().is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}
