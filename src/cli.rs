use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};
use crate::logging;
use crate::renamer::config::ConfigOverrides;
use crate::renamer::resolve::CollisionPolicy;

#[derive(Debug, Parser)]
#[command(
    name = "docrename",
    version,
    about = "Rename .docx/.pdf submissions to <student-id>_<project>.<ext> from a spreadsheet lookup"
)]
struct Cli {
    /// Print the final report as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Debug-level logs on stderr; `rename` also echoes each scanned id string.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rename every matching document in the source folder.
    Rename(RenameArgs),
    /// Show what the identifier scan sees in one document.
    Inspect(InspectArgs),
    /// Resolve configuration and check the inputs exist.
    Status(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    /// Folder holding the documents (not searched recursively).
    #[arg(long)]
    folder: Option<PathBuf>,
    /// Spreadsheet (.xlsx/.xls/.ods/.csv) with identifier and project columns.
    #[arg(long)]
    spreadsheet: Option<PathBuf>,
    /// Document type to process: docx or pdf.
    #[arg(long)]
    extension: Option<String>,
    #[arg(long)]
    id_column: Option<String>,
    #[arg(long)]
    project_column: Option<String>,
    /// Number of leading lines scanned for the identifier.
    #[arg(long)]
    line_budget: Option<usize>,
    #[arg(long, value_enum)]
    collision_policy: Option<CollisionPolicy>,
    /// Append a JSON line per rename to this file.
    #[arg(long)]
    journal: Option<PathBuf>,
}

impl From<ConfigArgs> for ConfigOverrides {
    fn from(args: ConfigArgs) -> Self {
        Self {
            source_folder: args.folder,
            lookup_spreadsheet: args.spreadsheet,
            extension_filter: args.extension,
            id_column: args.id_column,
            project_column: args.project_column,
            line_budget: args.line_budget,
            collision_policy: args.collision_policy,
            journal_path: args.journal,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct RenameArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Report planned renames without touching any file.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Args)]
struct InspectArgs {
    file: PathBuf,
    #[arg(long)]
    line_budget: Option<usize>,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let state = if report.ok { "ok" } else { "issues" };
    println!("{}: {state}", report.command);
    for detail in &report.details {
        println!("  {detail}");
    }
    for issue in &report.issues {
        println!("  ! {issue}");
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let report = match cli.command {
        Command::Rename(args) => {
            let opts = commands::rename::RenameOptions {
                overrides: args.config.into(),
                dry_run: args.dry_run,
                echo_tokens: cli.verbose,
            };
            commands::rename::run(opts, std::io::stdout().lock())?
        }
        Command::Inspect(args) => commands::inspect::run(&commands::inspect::InspectOptions {
            file: args.file,
            line_budget: args.line_budget,
        })?,
        Command::Status(args) => commands::status::run(args.into())?,
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        bail!(
            "{} reported {} issue(s)",
            report.command,
            report.issues.len()
        );
    }
    Ok(())
}
