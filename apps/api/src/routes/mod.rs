pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::document::handlers as document_handlers;
use crate::state::AppState;

/// Room for the multipart framing and the job description next to the file.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_index))
        .route("/analyze", post(handlers::handle_analyze))
        .route("/download/:mode", get(handlers::handle_download))
        .route("/upload", post(document_handlers::handle_upload))
        .route("/document", get(document_handlers::handle_view_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
