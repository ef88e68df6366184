//! Document Text Extractor: turns an uploaded PDF or DOCX into plain text.
//!
//! Extraction never fails past this module: unreadable documents yield an
//! empty string plus an error `Notice`, and the caller carries on.

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::Notice;

pub mod docx;
pub mod handlers;
pub mod pdf;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detects the kind from the declared content type, falling back to the
    /// file extension when the browser sends something generic.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let from_type = content_type.and_then(|ct| {
            let essence = ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase();
            match essence.as_str() {
                PDF_MIME | "pdf" => Some(DocumentKind::Pdf),
                DOCX_MIME | "docx" => Some(DocumentKind::Docx),
                _ => None,
            }
        });

        from_type.or_else(|| {
            let ext = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
            match ext.as_str() {
                "pdf" => Some(DocumentKind::Pdf),
                "docx" => Some(DocumentKind::Docx),
                _ => None,
            }
        })
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
        }
    }
}

/// Raw upload as received from the browser.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<Self, AppError> {
        let kind = DocumentKind::detect(content_type, file_name).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported file type{}; please upload a PDF or DOCX resume",
                file_name.map(|n| format!(" for '{n}'")).unwrap_or_default()
            ))
        })?;

        Ok(Self {
            file_name: file_name.unwrap_or("resume").to_string(),
            kind,
            bytes,
        })
    }
}

/// Text pulled out of a document plus anything the user should be told about it.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub text: String,
    pub notices: Vec<Notice>,
    /// DOCX paragraphs for inline display. PDFs are shown through an iframe instead.
    pub preview: Vec<String>,
}

/// Extracts plain text from an uploaded document.
pub fn extract_text(document: &UploadedDocument) -> Extraction {
    match document.kind {
        DocumentKind::Pdf => pdf::extract(&document.bytes),
        DocumentKind::Docx => docx::extract(&document.bytes),
    }
}

/// Runs extraction on the blocking pool. Parser panics are contained and
/// reported like any other unreadable document.
pub async fn extract_in_background(document: UploadedDocument) -> Extraction {
    let kind = document.kind;
    let file_name = document.file_name.clone();

    let extraction = match tokio::task::spawn_blocking(move || extract_text(&document)).await {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!("Extraction task for '{file_name}' aborted: {e}");
            Extraction {
                notices: vec![read_failure(kind, "the document could not be parsed")],
                ..Extraction::default()
            }
        }
    };

    info!(
        "Extracted {} characters from '{}' ({} notices)",
        extraction.text.len(),
        file_name,
        extraction.notices.len()
    );
    extraction
}

pub(crate) fn read_failure(kind: DocumentKind, cause: impl std::fmt::Display) -> Notice {
    match kind {
        DocumentKind::Pdf => Notice::error(format!("Error reading PDF file: {cause}")),
        DocumentKind::Docx => Notice::error(format!("Error reading DOCX file: {cause}")),
    }
}
