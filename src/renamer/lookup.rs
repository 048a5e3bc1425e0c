use calamine::{Data, Reader, open_workbook_auto};
use std::collections::HashMap;
use std::path::Path;

use crate::error::RenameError;

/// Student identifier -> project name(s), built once per run.
///
/// Rows sharing an identifier are concatenated in sheet order with no
/// separator; downstream filenames depend on that exact shape.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    projects: HashMap<u64, String>,
    rows: usize,
}

impl LookupTable {
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for (id, project) in rows {
            table.push(id, project.as_ref());
        }
        table
    }

    fn push(&mut self, id: u64, project: &str) {
        self.rows += 1;
        self.projects.entry(id).or_default().push_str(project);
    }

    pub fn load(path: &Path, id_column: &str, project_column: &str) -> Result<Self, RenameError> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let table = if is_csv {
            load_csv(path, id_column, project_column)?
        } else {
            load_workbook(path, id_column, project_column)?
        };
        tracing::debug!(
            path = %path.display(),
            rows = table.rows,
            ids = table.projects.len(),
            "lookup table loaded"
        );
        Ok(table)
    }

    /// Empty string means no usable project for `id`.
    pub fn projects_for(&self, id: u64) -> String {
        self.projects.get(&id).cloned().unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }
}

fn column_index<'a>(
    headers: impl IntoIterator<Item = &'a str>,
    column: &str,
    path: &Path,
) -> Result<usize, RenameError> {
    headers
        .into_iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| RenameError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn parse_id_text(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

fn id_from_cell(cell: &Data) -> Option<u64> {
    match cell {
        Data::Int(v) => u64::try_from(*v).ok(),
        Data::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v <= u64::MAX as f64 => {
            Some(*v as u64)
        }
        Data::String(s) => parse_id_text(s),
        _ => None,
    }
}

fn project_from_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn spreadsheet_error(path: &Path, reason: impl ToString) -> RenameError {
    RenameError::Spreadsheet {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn load_workbook(
    path: &Path,
    id_column: &str,
    project_column: &str,
) -> Result<LookupTable, RenameError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_error(path, "workbook has no worksheets"))?
        .map_err(|e| spreadsheet_error(path, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(RenameError::MissingColumn {
            path: path.to_path_buf(),
            column: id_column.to_string(),
        });
    };
    let header_text: Vec<String> = header.iter().map(project_from_cell).collect();
    let id_idx = column_index(header_text.iter().map(String::as_str), id_column, path)?;
    let project_idx = column_index(header_text.iter().map(String::as_str), project_column, path)?;

    let mut table = LookupTable::default();
    for row in rows {
        let Some(id) = row.get(id_idx).and_then(id_from_cell) else {
            continue;
        };
        let project = row.get(project_idx).map(project_from_cell).unwrap_or_default();
        table.push(id, &project);
    }
    Ok(table)
}

fn load_csv(path: &Path, id_column: &str, project_column: &str) -> Result<LookupTable, RenameError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| spreadsheet_error(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| spreadsheet_error(path, e))?
        .clone();
    let id_idx = column_index(headers.iter(), id_column, path)?;
    let project_idx = column_index(headers.iter(), project_column, path)?;

    let mut table = LookupTable::default();
    for record in reader.records() {
        let record = record.map_err(|e| spreadsheet_error(path, e))?;
        let Some(id) = record.get(id_idx).and_then(parse_id_text) else {
            continue;
        };
        table.push(id, record.get(project_idx).unwrap_or_default());
    }
    Ok(table)
}
