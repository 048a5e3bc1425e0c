use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::RenameError;
use crate::renamer::config::RenamerConfig;
use crate::renamer::extract::extract_document;
use crate::renamer::journal::{self, JournalEntry};
use crate::renamer::lookup::LookupTable;
use crate::renamer::reader::DocumentReader;
use crate::renamer::resolve::{Resolution, resolve};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenameRecord {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkSummary {
    pub renamed: Vec<RenameRecord>,
    pub no_identifier: usize,
    pub parse_errors: usize,
    pub no_project: usize,
    pub not_matching: usize,
}

/// Applies extraction and resolution to every matching file of one folder.
///
/// Status lines go to `out`, one per directory entry. The walker never touches
/// process-wide console state.
pub struct FolderWalker<'a, W: Write> {
    config: &'a RenamerConfig,
    reader: &'a dyn DocumentReader,
    table: &'a LookupTable,
    out: W,
    dry_run: bool,
    echo_tokens: bool,
}

impl<'a, W: Write> FolderWalker<'a, W> {
    pub fn new(
        config: &'a RenamerConfig,
        reader: &'a dyn DocumentReader,
        table: &'a LookupTable,
        out: W,
    ) -> Self {
        Self {
            config,
            reader,
            table,
            out,
            dry_run: false,
            echo_tokens: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Print the joined identifier string before each outcome line.
    pub fn echo_tokens(mut self, echo_tokens: bool) -> Self {
        self.echo_tokens = echo_tokens;
        self
    }

    fn say(&mut self, line: impl Display) -> Result<(), RenameError> {
        writeln!(self.out, "{line}").map_err(RenameError::Output)
    }

    pub fn run(&mut self) -> Result<WalkSummary, RenameError> {
        let folder = self.config.source_folder.clone();
        // Snapshot first: renames below add entries to the same directory.
        let entries = fs::read_dir(&folder)
            .and_then(|rd| rd.collect::<Result<Vec<_>, _>>())
            .map_err(|e| RenameError::io(&folder, e))?;
        tracing::info!(folder = %folder.display(), entries = entries.len(), dry_run = self.dry_run, "walking folder");

        let mut summary = WalkSummary::default();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for entry in entries {
            let path = entry.path();
            if !(path.is_file() && self.reader.matches(&path)) {
                summary.not_matching += 1;
                let label = self.reader.label();
                self.say(format_args!("Not a {label} file."))?;
                continue;
            }
            self.process(&folder, &path, &mut summary, &mut claimed)?;
        }

        self.out.flush().map_err(RenameError::Output)?;
        Ok(summary)
    }

    fn process(
        &mut self,
        folder: &Path,
        path: &Path,
        summary: &mut WalkSummary,
        claimed: &mut HashSet<PathBuf>,
    ) -> Result<(), RenameError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let extraction = extract_document(self.reader, path, self.config.line_budget).map_err(
            |source| RenameError::Document {
                path: path.to_path_buf(),
                source,
            },
        )?;
        tracing::debug!(file = %file_name, tokens = ?extraction.tokens, "identifier scan finished");
        if self.echo_tokens {
            let joined = extraction.tokens.concat();
            self.say(joined)?;
        }

        let resolution = resolve(
            &extraction.tokens,
            self.table,
            &self.config.extension_filter,
            folder,
            self.config.collision_policy,
            |candidate: &Path| candidate.exists() || claimed.contains(candidate),
        )?;

        match resolution {
            Resolution::NoIdentifier => {
                summary.no_identifier += 1;
                self.say("No valid ID found")
            }
            Resolution::ParseError { joined } => {
                summary.parse_errors += 1;
                tracing::warn!(file = %file_name, joined = %joined, "identifier failed to parse");
                self.say("Error: Extracted data contains non-numeric characters.")
            }
            Resolution::NoProjectMatch { id } => {
                summary.no_project += 1;
                tracing::debug!(file = %file_name, id, "identifier not in lookup table");
                self.say("No project name found")
            }
            Resolution::Target(plan) => {
                if self.dry_run {
                    claimed.insert(plan.path.clone());
                    self.say(format_args!(
                        "File '{file_name}' would be renamed to '{}'",
                        plan.file_name
                    ))?;
                } else {
                    fs::rename(path, &plan.path).map_err(|e| RenameError::io(path, e))?;
                    if let Some(journal_path) = &self.config.journal_path {
                        let entry = JournalEntry::new(
                            folder,
                            &file_name,
                            &plan.file_name,
                            plan.id,
                            &plan.project,
                        );
                        journal::append_entry(journal_path, &entry)?;
                    }
                    self.say(format_args!(
                        "File '{file_name}' renamed to '{}'",
                        plan.file_name
                    ))?;
                }
                summary.renamed.push(RenameRecord {
                    from: file_name,
                    to: plan.file_name,
                });
                Ok(())
            }
        }
    }
}
