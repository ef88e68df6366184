use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::warn;

use super::{read_failure, DocumentKind, Extraction};
use crate::models::Notice;

/// Joins top-level body paragraphs in document order, one `\n` after each.
/// Table contents are not part of the paragraph stream and are skipped.
pub fn extract(bytes: &[u8]) -> Extraction {
    match paragraphs(bytes) {
        Ok(paragraphs) => {
            let mut text = String::new();
            for paragraph in &paragraphs {
                text.push_str(paragraph);
                text.push('\n');
            }
            Extraction {
                text,
                notices: Vec::new(),
                preview: paragraphs,
            }
        }
        Err(e) => {
            warn!("DOCX extraction failed: {e}");
            Extraction {
                notices: vec![
                    read_failure(DocumentKind::Docx, &e),
                    Notice::error(format!("Error displaying DOCX file: {e}")),
                ],
                ..Extraction::default()
            }
        }
    }
}

/// Plain text of every body paragraph.
pub fn paragraphs(bytes: &[u8]) -> Result<Vec<String>, docx_rs::ReaderError> {
    let docx = docx_rs::read_docx(bytes)?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}
