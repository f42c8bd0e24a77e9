//! Text extraction for ingestible documents.
//!
//! Boundary collaborator with a narrow contract: bytes in, an ordered
//! sequence of page texts out. The chunking pipeline only ever consumes
//! plain text.
//!
//! PDF extraction goes through `pdf-extract`; pages are recovered from
//! the extractor's form-feed markers and numbered from 1. When no marker
//! survives extraction, the whole document is a single page 1. Anything
//! that is not a PDF is treated as UTF-8 plain text and carries no page
//! numbers at all; downstream, the ordinal-as-page fallback applies.

use std::path::Path;

use anyhow::{Context, Result};

/// One extracted page (or the whole document, for unpaginated sources).
#[derive(Debug, Clone)]
pub struct PageText {
    pub text: String,
    /// 1-indexed page number for paginated sources; `None` otherwise.
    pub page: Option<i64>,
}

/// Extract ordered page texts from a document file's bytes.
///
/// Dispatches on the file extension: `.pdf` gets PDF extraction,
/// everything else is decoded as UTF-8 plain text. Blank pages are
/// dropped.
pub fn extract_pages(path: &Path, bytes: &[u8]) -> Result<Vec<PageText>> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        extract_pdf(bytes)
    } else {
        let text = String::from_utf8(bytes.to_vec())
            .with_context(|| format!("{} is not valid UTF-8 text", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![PageText {
            text: text.trim().to_string(),
            page: None,
        }])
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageText>> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("Failed to read PDF: {e}"))?;
    Ok(split_form_feed_pages(&text))
}

/// Split extractor output on form-feed page markers, numbering from 1.
///
/// Page numbers count every marker-delimited segment, so a blank page
/// keeps later pages' numbers honest even though it is dropped.
fn split_form_feed_pages(text: &str) -> Vec<PageText> {
    text.split('\u{c}')
        .enumerate()
        .filter_map(|(i, page)| {
            let trimmed = page.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(PageText {
                    text: trimmed.to_string(),
                    page: Some(i as i64 + 1),
                })
            }
        })
        .collect()
}
