use lopdf::Document;
use std::path::Path;

use super::{DocumentReader, TextUnits};
use crate::error::DocumentError;

/// Page text, one unit per page, extracted only when the caller asks for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReader;

fn page_text(doc: &Document, page: u32, path: &Path) -> String {
    match doc.extract_text(&[page]) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                page,
                error = %err,
                "pdf page text could not be decoded; treating page as empty"
            );
            String::new()
        }
    }
}

impl DocumentReader for PdfReader {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn label(&self) -> &'static str {
        "PDF"
    }

    fn text_units(&self, path: &Path) -> Result<TextUnits, DocumentError> {
        let doc = Document::load(path)?;
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        tracing::trace!(path = %path.display(), pages = pages.len(), "pdf loaded");

        let path = path.to_path_buf();
        Ok(Box::new(
            pages
                .into_iter()
                .map(move |page| Ok(page_text(&doc, page, &path))),
        ))
    }
}
