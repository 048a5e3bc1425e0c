use std::path::Path;

use crate::error::DocumentError;
use crate::renamer::digits::is_digit;
use crate::renamer::reader::DocumentReader;
use crate::renamer::resolve::ID_WIDTH;

/// Tokens found in the leading lines plus the lines that were looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub tokens: Vec<String>,
    pub preview: String,
    pub lines_processed: usize,
}

fn is_identifier(word: &str) -> bool {
    word.chars().count() == ID_WIDTH && word.chars().all(is_digit)
}

/// Scans text units line by line, stopping on the first line that carries an
/// identifier or once `line_budget` lines were processed.
pub fn extract<I>(units: I, line_budget: usize) -> Result<Extraction, DocumentError>
where
    I: IntoIterator<Item = Result<String, DocumentError>>,
{
    let mut out = Extraction::default();

    for unit in units {
        if out.lines_processed >= line_budget {
            break;
        }
        let unit = unit?;
        for line in unit.trim().split('\n') {
            if out.lines_processed >= line_budget {
                break;
            }
            let line = line.trim();
            out.preview.push_str(line);
            out.preview.push('\n');
            out.tokens.extend(
                line.split_whitespace()
                    .filter(|word| is_identifier(word))
                    .map(str::to_owned),
            );
            out.lines_processed += 1;
            if !out.tokens.is_empty() {
                return Ok(out);
            }
        }
    }

    Ok(out)
}

pub fn extract_document(
    reader: &dyn DocumentReader,
    path: &Path,
    line_budget: usize,
) -> Result<Extraction, DocumentError> {
    let units = reader.text_units(path)?;
    extract(units, line_budget)
}
