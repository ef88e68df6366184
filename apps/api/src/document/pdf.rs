use tracing::{debug, warn};

use super::{read_failure, DocumentKind, Extraction};
use crate::models::Notice;

/// Concatenates the text of every page in page order.
/// Pages without extractable text contribute nothing.
pub fn extract(bytes: &[u8]) -> Extraction {
    let pages = match pdf_extract::extract_text_from_mem_by_pages(bytes) {
        Ok(pages) => pages,
        Err(e) => {
            warn!("PDF extraction failed: {e}");
            return Extraction {
                notices: vec![read_failure(DocumentKind::Pdf, e)],
                ..Extraction::default()
            };
        }
    };

    debug!("PDF has {} pages", pages.len());
    let text = join_pages(pages);

    let mut notices = Vec::new();
    if text.trim().is_empty() {
        warn!("PDF contains no extractable text");
        notices.push(Notice::error(
            "The PDF file does not contain extractable text.",
        ));
    }

    Extraction {
        text,
        notices,
        preview: Vec::new(),
    }
}

fn join_pages(pages: Vec<String>) -> String {
    pages.into_iter().filter(|p| !p.is_empty()).collect()
}
