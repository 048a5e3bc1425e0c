//! `.docx` text units: the top-level body paragraphs of `word/document.xml`.
//!
//! Table cells, text boxes, headers and footers are not paragraphs of the
//! body and are skipped. Line breaks inside a paragraph come through as `\n`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use zip::ZipArchive;

use super::{DocumentReader, TextUnits};
use crate::error::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Default, Clone, Copy)]
pub struct DocxReader;

impl DocumentReader for DocxReader {
    fn extension(&self) -> &'static str {
        "docx"
    }

    fn label(&self) -> &'static str {
        "DOCX"
    }

    fn text_units(&self, path: &Path) -> Result<TextUnits, DocumentError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;
        let part = match archive.by_name(DOCUMENT_PART) {
            Ok(part) => part,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(DocumentError::MissingPart(DOCUMENT_PART));
            }
            Err(e) => return Err(e.into()),
        };
        let paragraphs = body_paragraphs(BufReader::new(part))?;
        tracing::trace!(path = %path.display(), paragraphs = paragraphs.len(), "docx parsed");
        Ok(Box::new(paragraphs.into_iter().map(Ok)))
    }
}

fn break_text(e: &BytesStart<'_>) -> &'static str {
    let is_page_or_column = e.attributes().flatten().any(|attr| {
        attr.key.as_ref() == b"w:type"
            && matches!(attr.value.as_ref(), b"page" | b"column")
    });
    if is_page_or_column { "" } else { "\n" }
}

#[derive(Default)]
struct ParagraphCollector {
    depth: usize,
    body_depth: Option<usize>,
    paragraph_depth: Option<usize>,
    hyperlink_depth: Option<usize>,
    run_depth: Option<usize>,
    textbox_depth: usize,
    in_text: bool,
    current: String,
    paragraphs: Vec<String>,
}

impl ParagraphCollector {
    fn is_body_child(&self) -> bool {
        self.body_depth.is_some_and(|body| self.depth == body + 1)
    }

    /// Runs count when they sit directly in the paragraph or in one of its
    /// hyperlinks. Runs under `w:ins`, `w:smartTag` and similar wrappers do not.
    fn is_paragraph_run(&self) -> bool {
        let Some(p) = self.paragraph_depth else {
            return false;
        };
        let in_hyperlink = self.hyperlink_depth == Some(p + 1) && self.depth == p + 2;
        self.run_depth.is_none() && (self.depth == p + 1 || in_hyperlink)
    }

    fn collecting(&self) -> bool {
        self.run_depth.is_some() && self.textbox_depth == 0
    }

    fn start(&mut self, e: &BytesStart<'_>) {
        match e.name().as_ref() {
            b"w:body" => self.body_depth = Some(self.depth),
            b"w:p" if self.paragraph_depth.is_none() && self.is_body_child() => {
                self.paragraph_depth = Some(self.depth);
                self.current.clear();
            }
            b"w:hyperlink"
                if self
                    .paragraph_depth
                    .is_some_and(|p| self.depth == p + 1 && self.hyperlink_depth.is_none()) =>
            {
                self.hyperlink_depth = Some(self.depth);
            }
            b"w:r" if self.is_paragraph_run() => self.run_depth = Some(self.depth),
            b"w:txbxContent" => self.textbox_depth += 1,
            b"w:t" if self.collecting() => self.in_text = true,
            b"w:br" | b"w:cr" if self.collecting() => self.current.push_str(break_text(e)),
            b"w:tab" if self.collecting() => self.current.push('\t'),
            _ => {}
        }
        self.depth += 1;
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        match e.name().as_ref() {
            b"w:p" if self.paragraph_depth.is_none() && self.is_body_child() => {
                self.paragraphs.push(String::new());
            }
            b"w:br" | b"w:cr" if self.collecting() => self.current.push_str(break_text(e)),
            b"w:tab" if self.collecting() => self.current.push('\t'),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        self.depth = self.depth.saturating_sub(1);
        match name {
            b"w:t" => self.in_text = false,
            b"w:txbxContent" => self.textbox_depth = self.textbox_depth.saturating_sub(1),
            b"w:r" if self.run_depth == Some(self.depth) => self.run_depth = None,
            b"w:hyperlink" if self.hyperlink_depth == Some(self.depth) => {
                self.hyperlink_depth = None;
            }
            b"w:p" if self.paragraph_depth == Some(self.depth) => {
                self.paragraph_depth = None;
                self.paragraphs.push(std::mem::take(&mut self.current));
            }
            b"w:body" => self.body_depth = None,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text && self.collecting() {
            self.current.push_str(text);
        }
    }
}

fn body_paragraphs<R: BufRead>(source: R) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_reader(source);
    let mut collector = ParagraphCollector::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => collector.start(&e),
            Event::Empty(e) => collector.empty(&e),
            Event::End(e) => collector.end(e.name().as_ref()),
            Event::Text(t) => collector.text(&t.unescape()?),
            Event::CData(t) => collector.text(&String::from_utf8_lossy(&t)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(collector.paragraphs)
}
