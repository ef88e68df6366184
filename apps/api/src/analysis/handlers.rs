//! Axum route handlers for the page and its analysis actions.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::analysis::controller::run_mode;
use crate::errors::AppError;
use crate::models::AnalysisMode;
use crate::presentation::{with_session_cookie, AtsPage};
use crate::session::{Session, SessionContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub mode: AnalysisMode,
    #[serde(default)]
    pub job_description: String,
}

/// GET /
///
/// Renders the page for the session's active mode, redisplaying its slot if Present.
pub async fn handle_index(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    let page = render_session(&state, session, |s| {
        AtsPage::build(s, state.ai_enabled(), None, Vec::new())
    })
    .await?;
    page.respond(session)
}

/// POST /analyze
///
/// Runs the selected mode and renders the page with its outcome.
pub async fn handle_analyze(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<AnalyzeForm>,
) -> Result<Response, AppError> {
    let outcome = run_mode(
        &state.sessions,
        session.id,
        form.mode,
        &form.job_description,
        state.llm.as_deref(),
    )
    .await;

    let page = render_session(&state, session, |s| {
        AtsPage::build(s, state.ai_enabled(), Some(&outcome), Vec::new())
    })
    .await?;
    page.respond(session)
}

/// GET /download/:mode
///
/// Exports a Present slot as a plain-text attachment named after its mode.
pub async fn handle_download(
    State(state): State<AppState>,
    session: SessionContext,
    Path(mode): Path<AnalysisMode>,
) -> Result<Response, AppError> {
    let text = state
        .sessions
        .read(session.id, |s| s.slots.get(mode).map(String::from))
        .await
        .flatten()
        .ok_or_else(|| AppError::NotFound(format!("No {} result to download", mode.label())))?;

    let response = (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", mode.file_name()),
            ),
        ],
        text,
    );
    Ok(with_session_cookie(session, response.into_response()))
}

/// Builds the page from the current session state.
pub(crate) async fn render_session(
    state: &AppState,
    session: SessionContext,
    build: impl FnOnce(&Session) -> AtsPage,
) -> Result<AtsPage, AppError> {
    state
        .sessions
        .read(session.id, build)
        .await
        .ok_or_else(|| AppError::NotFound("Session expired".to_string()))
}
