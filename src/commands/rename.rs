use anyhow::{Context, Result};
use std::io::Write;

use crate::commands::CommandReport;
use crate::renamer::config::{ConfigOverrides, load_config};
use crate::renamer::lookup::LookupTable;
use crate::renamer::reader::reader_for_extension;
use crate::renamer::walker::FolderWalker;

#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    pub overrides: ConfigOverrides,
    pub dry_run: bool,
    pub echo_tokens: bool,
}

pub fn run(opts: RenameOptions, out: impl Write) -> Result<CommandReport> {
    let cfg = load_config(opts.overrides)?;
    let mut report = CommandReport::new("rename");

    report.detail(format!("source_folder={}", cfg.source_folder.display()));
    report.detail(format!(
        "lookup_spreadsheet={}",
        cfg.lookup_spreadsheet.display()
    ));
    report.detail(format!("extension_filter={}", cfg.extension_filter));
    report.detail(format!("collision_policy={}", cfg.collision_policy));

    let reader = reader_for_extension(&cfg.extension_filter)?;
    let table = LookupTable::load(&cfg.lookup_spreadsheet, &cfg.id_column, &cfg.project_column)
        .with_context(|| {
            format!(
                "failed to load lookup table {}",
                cfg.lookup_spreadsheet.display()
            )
        })?;
    report.detail(format!("lookup_rows={}", table.row_count()));

    let summary = FolderWalker::new(&cfg, reader.as_ref(), &table, out)
        .dry_run(opts.dry_run)
        .echo_tokens(opts.echo_tokens)
        .run()
        .with_context(|| format!("rename run aborted in {}", cfg.source_folder.display()))?;

    if opts.dry_run {
        report.detail("dry-run: no files were renamed".to_string());
        report.detail(format!("planned={}", summary.renamed.len()));
    } else {
        report.detail(format!("renamed={}", summary.renamed.len()));
    }
    report.detail(format!("no_identifier={}", summary.no_identifier));
    report.detail(format!("no_project={}", summary.no_project));
    report.detail(format!("parse_errors={}", summary.parse_errors));
    report.detail(format!("not_matching={}", summary.not_matching));
    if let Some(journal) = &cfg.journal_path {
        report.detail(format!("journal={}", journal.display()));
    }

    Ok(report)
}
