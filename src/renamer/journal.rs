use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::RenameError;

#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub at: String,
    pub folder: String,
    pub from: String,
    pub to: String,
    pub id: u64,
    pub project: String,
}

impl JournalEntry {
    pub fn new(folder: &Path, from: &str, to: &str, id: u64, project: &str) -> Self {
        Self {
            at: chrono::Utc::now().to_rfc3339(),
            folder: folder.display().to_string(),
            from: from.to_string(),
            to: to.to_string(),
            id,
            project: project.to_string(),
        }
    }
}

/// Appends one JSON line per completed rename.
pub fn append_entry(journal: &Path, entry: &JournalEntry) -> Result<(), RenameError> {
    if let Some(parent) = journal.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RenameError::io(parent, e))?;
    }

    let line = serde_json::to_string(entry)
        .map_err(|e| RenameError::io(journal, e.into()))?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(journal)
        .map_err(|e| RenameError::io(journal, e))?;
    writeln!(file, "{line}").map_err(|e| RenameError::io(journal, e))
}
