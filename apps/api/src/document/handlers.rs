//! Axum route handlers for uploading and viewing the resume.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::analysis::handlers::render_session;
use crate::document::{extract_in_background, UploadedDocument};
use crate::errors::AppError;
use crate::models::Notice;
use crate::presentation::{header_safe_file_name, with_session_cookie, AtsPage};
use crate::session::{SessionContext, StoredDocument};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// Fields of the upload form. Either may be missing.
#[derive(Debug, Default)]
struct UploadForm {
    document: Option<UploadedDocument>,
    job_description: Option<String>,
}

async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty, nameless part when no file was picked.
                if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                    continue;
                }
                form.document = Some(UploadedDocument::new(
                    file_name.as_deref(),
                    content_type.as_deref(),
                    bytes,
                )?);
            }
            Some(JOB_DESCRIPTION_FIELD) => form.job_description = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}

/// POST /upload
///
/// Multipart form with a `resume` file and the current `job_description`, so
/// the text area survives the round trip. The document is extracted once here
/// and kept in the session. A rejected upload re-renders the page with the
/// reason and leaves the session untouched.
pub async fn handle_upload(
    State(state): State<AppState>,
    session: SessionContext,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let form = match read_upload_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => return reject_upload(&state, session, e).await,
    };

    let mut notices = Vec::new();
    let stored = match form.document {
        Some(document) => {
            info!(
                "Session {}: received '{}' ({} bytes, {:?})",
                session.id,
                document.file_name,
                document.bytes.len(),
                document.kind
            );
            let extraction = extract_in_background(document.clone()).await;
            notices.push(Notice::info(format!("Loaded {}", document.file_name)));
            Some(StoredDocument {
                document,
                extraction,
            })
        }
        None => None,
    };

    state
        .sessions
        .update(session.id, |s| {
            if let Some(stored) = stored {
                s.document = Some(stored);
            }
            if let Some(jd) = form.job_description {
                s.job_description = jd;
            }
        })
        .await;

    let page = render_session(&state, session, |s| {
        AtsPage::build(s, state.ai_enabled(), None, notices)
    })
    .await?;
    page.respond(session)
}

/// Shows an unsupported or unreadable upload as an error notice on the page,
/// keeping the status code of the failure.
async fn reject_upload(
    state: &AppState,
    session: SessionContext,
    error: AppError,
) -> Result<Response, AppError> {
    let (status, message) = match error {
        AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        AppError::Upload(e) => (
            e.status(),
            format!("The upload could not be read: {}", e.body_text()),
        ),
        other => return Err(other),
    };
    warn!("Session {}: upload rejected: {message}", session.id);

    let page = render_session(state, session, |s| {
        AtsPage::build(s, state.ai_enabled(), None, vec![Notice::error(message)])
    })
    .await?;
    let mut response = page.respond(session)?;
    *response.status_mut() = status;
    Ok(response)
}

/// GET /document
///
/// Serves the uploaded resume inline so the page can embed it.
pub async fn handle_view_document(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    let document = state
        .sessions
        .read(session.id, |s| s.document.as_ref().map(|d| d.document.clone()))
        .await
        .flatten()
        .ok_or_else(|| AppError::NotFound("No resume uploaded".to_string()))?;

    let response = (
        [
            (header::CONTENT_TYPE, document.kind.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "inline; filename=\"{}\"",
                    header_safe_file_name(&document.file_name)
                ),
            ),
        ],
        document.bytes,
    );
    Ok(with_session_cookie(session, response.into_response()))
}
