pub mod docx;
pub mod pdf;

use std::path::Path;

use crate::error::{DocumentError, RenameError};

pub use docx::DocxReader;
pub use pdf::PdfReader;

/// Text units (paragraphs or pages) in document order, produced on demand.
pub type TextUnits = Box<dyn Iterator<Item = Result<String, DocumentError>>>;

/// One implementation per supported document format.
pub trait DocumentReader {
    fn extension(&self) -> &'static str;

    /// Upper-case format name for console messages.
    fn label(&self) -> &'static str;

    fn text_units(&self, path: &Path) -> Result<TextUnits, DocumentError>;

    fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.extension())
    }
}

pub fn reader_for_extension(ext: &str) -> Result<Box<dyn DocumentReader>, RenameError> {
    match ext {
        "docx" => Ok(Box::new(DocxReader)),
        "pdf" => Ok(Box::new(PdfReader)),
        other => Err(RenameError::UnsupportedExtension(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_picks_reader_by_extension() {
        assert_eq!(reader_for_extension("docx").expect("docx").label(), "DOCX");
        assert_eq!(reader_for_extension("pdf").expect("pdf").label(), "PDF");
        assert!(matches!(
            reader_for_extension("txt"),
            Err(RenameError::UnsupportedExtension(ref ext)) if ext == "txt"
        ));
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let reader = DocxReader;
        assert!(reader.matches(Path::new("/docs/report.docx")));
        assert!(!reader.matches(Path::new("/docs/report.DOCX")));
        assert!(!reader.matches(Path::new("/docs/report.docx.bak")));
        assert!(!reader.matches(Path::new("/docs/docx")));
    }
}
