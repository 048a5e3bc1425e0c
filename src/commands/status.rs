use anyhow::Result;

use crate::commands::CommandReport;
use crate::renamer::config::{ConfigOverrides, load_config, resolve_config_path};
use crate::renamer::lookup::LookupTable;

pub fn run(overrides: ConfigOverrides) -> Result<CommandReport> {
    let cfg = load_config(overrides)?;
    let mut report = CommandReport::new("status");

    match resolve_config_path() {
        Some(path) if path.exists() => report.detail(format!("config_file={}", path.display())),
        Some(path) => report.detail(format!("config_file={} (absent)", path.display())),
        None => report.detail("config_file=none".to_string()),
    }
    report.detail(format!("source_folder={}", cfg.source_folder.display()));
    report.detail(format!(
        "lookup_spreadsheet={}",
        cfg.lookup_spreadsheet.display()
    ));
    report.detail(format!("extension_filter={}", cfg.extension_filter));
    report.detail(format!("id_column={}", cfg.id_column));
    report.detail(format!("project_column={}", cfg.project_column));
    report.detail(format!("line_budget={}", cfg.line_budget));
    report.detail(format!("collision_policy={}", cfg.collision_policy));
    if let Some(journal) = &cfg.journal_path {
        report.detail(format!("journal={}", journal.display()));
    }

    if !cfg.source_folder.is_dir() {
        report.issue(format!(
            "missing source folder ({})",
            cfg.source_folder.display()
        ));
    }
    if !cfg.lookup_spreadsheet.is_file() {
        report.issue(format!(
            "missing lookup spreadsheet ({})",
            cfg.lookup_spreadsheet.display()
        ));
        return Ok(report);
    }

    match LookupTable::load(&cfg.lookup_spreadsheet, &cfg.id_column, &cfg.project_column) {
        Ok(table) => report.detail(format!("lookup_rows={}", table.row_count())),
        Err(err) => report.issue(format!("lookup spreadsheet unusable: {err}")),
    }

    Ok(report)
}
