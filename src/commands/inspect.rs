use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::renamer::config::{ConfigOverrides, load_config, normalize_extension};
use crate::renamer::extract::extract_document;
use crate::renamer::reader::reader_for_extension;
use crate::renamer::resolve::leading_id;

#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub file: PathBuf,
    pub line_budget: Option<usize>,
}

pub fn run(opts: &InspectOptions) -> Result<CommandReport> {
    let cfg = load_config(ConfigOverrides {
        line_budget: opts.line_budget,
        ..ConfigOverrides::default()
    })?;
    let mut report = CommandReport::new("inspect");
    report.detail(format!("file={}", opts.file.display()));
    report.detail(format!("line_budget={}", cfg.line_budget));

    let ext = opts
        .file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(normalize_extension)
        .unwrap_or_default();
    let reader = reader_for_extension(&ext)?;

    let extraction = extract_document(reader.as_ref(), &opts.file, cfg.line_budget)
        .with_context(|| format!("failed to read {}", opts.file.display()))?;

    report.detail(format!("lines_processed={}", extraction.lines_processed));
    for line in extraction.preview.lines() {
        report.detail(format!("preview| {line}"));
    }

    if extraction.tokens.is_empty() {
        report.detail("tokens=none".to_string());
        return Ok(report);
    }
    report.detail(format!("tokens={}", extraction.tokens.join(",")));
    match leading_id(&extraction.tokens.concat()) {
        Some(id) => report.detail(format!("identifier={id}")),
        None => report.issue("leading 8 characters are not a numeric identifier"),
    }

    Ok(report)
}
