use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::renamer::resolve::CollisionPolicy;

pub const DEFAULT_ID_COLUMN: &str = "รหัสนิสิต";
pub const DEFAULT_PROJECT_COLUMN: &str = "ชื่อโปรเจ็ค";
pub const DEFAULT_LINE_BUDGET: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamerConfig {
    pub source_folder: PathBuf,
    pub lookup_spreadsheet: PathBuf,
    pub extension_filter: String,
    pub id_column: String,
    pub project_column: String,
    pub line_budget: usize,
    pub collision_policy: CollisionPolicy,
    pub journal_path: Option<PathBuf>,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            source_folder: PathBuf::from("."),
            lookup_spreadsheet: PathBuf::from("projects.xlsx"),
            extension_filter: "docx".to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            project_column: DEFAULT_PROJECT_COLUMN.to_string(),
            line_budget: DEFAULT_LINE_BUDGET,
            collision_policy: CollisionPolicy::Suffix,
            journal_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialRenamerConfig {
    source_folder: Option<PathBuf>,
    lookup_spreadsheet: Option<PathBuf>,
    extension_filter: Option<String>,
    id_column: Option<String>,
    project_column: Option<String>,
    line_budget: Option<usize>,
    collision_policy: Option<CollisionPolicy>,
    journal_path: Option<PathBuf>,
}

/// Values supplied on the command line. They win over file and env layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_folder: Option<PathBuf>,
    pub lookup_spreadsheet: Option<PathBuf>,
    pub extension_filter: Option<String>,
    pub id_column: Option<String>,
    pub project_column: Option<String>,
    pub line_budget: Option<usize>,
    pub collision_policy: Option<CollisionPolicy>,
    pub journal_path: Option<PathBuf>,
}

/// Parses a set env value; a value that does not parse is reported and ignored.
fn parsed_or<T: FromStr>(var: &str, raw: Option<String>, fallback: T) -> T {
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(var, value = %raw, "ignoring unparsable environment value");
            fallback
        }
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    parsed_or(var, env::var(var).ok(), fallback)
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

fn env_optional_path(var: &str, fallback: Option<PathBuf>) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => fallback,
    }
}

fn env_or_policy(var: &str, fallback: CollisionPolicy) -> CollisionPolicy {
    parsed_or(var, env::var(var).ok(), fallback)
}

/// Accepts `docx`, `.docx`, `PDF`, ... and returns the bare lowercase form.
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn validate(cfg: &RenamerConfig) -> Result<()> {
    if cfg.line_budget == 0 {
        return Err(anyhow!("invalid line budget: must be >= 1"));
    }
    if cfg.extension_filter != "docx" && cfg.extension_filter != "pdf" {
        return Err(anyhow!(
            "invalid extension filter `{}`: use `docx` or `pdf`",
            cfg.extension_filter
        ));
    }
    if cfg.id_column.trim().is_empty() {
        return Err(anyhow!("invalid id column: cannot be empty"));
    }
    if cfg.project_column.trim().is_empty() {
        return Err(anyhow!("invalid project column: cannot be empty"));
    }
    Ok(())
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("DOCRENAME_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".docrename").join("docrename.toml"))
}

fn merge_file_config(base: &mut RenamerConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read docrename config {}", path.display()))?;
    let parsed: PartialRenamerConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse docrename config {}: {err}", path.display()))?;
    merge_partial(base, parsed);
    Ok(())
}

fn merge_partial(base: &mut RenamerConfig, parsed: PartialRenamerConfig) {
    if let Some(v) = parsed.source_folder {
        base.source_folder = v;
    }
    if let Some(v) = parsed.lookup_spreadsheet {
        base.lookup_spreadsheet = v;
    }
    if let Some(v) = parsed.extension_filter {
        base.extension_filter = v;
    }
    if let Some(v) = parsed.id_column {
        base.id_column = v;
    }
    if let Some(v) = parsed.project_column {
        base.project_column = v;
    }
    if let Some(v) = parsed.line_budget {
        base.line_budget = v;
    }
    if let Some(v) = parsed.collision_policy {
        base.collision_policy = v;
    }
    if parsed.journal_path.is_some() {
        base.journal_path = parsed.journal_path;
    }
}

fn apply_env(cfg: &mut RenamerConfig) {
    cfg.source_folder = env_or_path("DOCRENAME_SOURCE_FOLDER", cfg.source_folder.clone());
    cfg.lookup_spreadsheet =
        env_or_path("DOCRENAME_SPREADSHEET", cfg.lookup_spreadsheet.clone());
    cfg.extension_filter = env_or_string("DOCRENAME_EXTENSION", &cfg.extension_filter);
    cfg.id_column = env_or_string("DOCRENAME_ID_COLUMN", &cfg.id_column);
    cfg.project_column = env_or_string("DOCRENAME_PROJECT_COLUMN", &cfg.project_column);
    cfg.line_budget = env_or_usize("DOCRENAME_LINE_BUDGET", cfg.line_budget);
    cfg.collision_policy = env_or_policy("DOCRENAME_COLLISION_POLICY", cfg.collision_policy);
    cfg.journal_path = env_optional_path("DOCRENAME_JOURNAL_PATH", cfg.journal_path.take());
}

fn apply_overrides(cfg: &mut RenamerConfig, overrides: ConfigOverrides) {
    merge_partial(
        cfg,
        PartialRenamerConfig {
            source_folder: overrides.source_folder,
            lookup_spreadsheet: overrides.lookup_spreadsheet,
            extension_filter: overrides.extension_filter,
            id_column: overrides.id_column,
            project_column: overrides.project_column,
            line_budget: overrides.line_budget,
            collision_policy: overrides.collision_policy,
            journal_path: overrides.journal_path,
        },
    );
}

pub fn load_config(overrides: ConfigOverrides) -> Result<RenamerConfig> {
    let mut cfg = RenamerConfig::default();
    merge_file_config(&mut cfg)?;
    apply_env(&mut cfg);
    apply_overrides(&mut cfg, overrides);
    cfg.extension_filter = normalize_extension(&cfg.extension_filter);

    validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_extension_strips_dot_and_case() {
        assert_eq!(normalize_extension(".DOCX"), "docx");
        assert_eq!(normalize_extension(" pdf "), "pdf");
    }

    #[test]
    fn validate_rejects_zero_budget_and_unknown_extension() {
        let cfg = RenamerConfig {
            line_budget: 0,
            ..RenamerConfig::default()
        };
        assert!(validate(&cfg).is_err());

        let cfg = RenamerConfig {
            extension_filter: "txt".to_string(),
            ..RenamerConfig::default()
        };
        assert!(validate(&cfg).is_err());

        assert!(validate(&RenamerConfig::default()).is_ok());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut cfg = RenamerConfig::default();
        apply_overrides(
            &mut cfg,
            ConfigOverrides {
                source_folder: Some(PathBuf::from("/srv/submissions")),
                line_budget: Some(4),
                ..ConfigOverrides::default()
            },
        );
        assert_eq!(cfg.source_folder, PathBuf::from("/srv/submissions"));
        assert_eq!(cfg.line_budget, 4);
        assert_eq!(cfg.id_column, DEFAULT_ID_COLUMN);
        assert_eq!(cfg.collision_policy, CollisionPolicy::Suffix);
    }

    #[test]
    fn unparsable_env_values_fall_back() {
        assert_eq!(parsed_or("DOCRENAME_LINE_BUDGET", Some("abc".into()), 10usize), 10);
        assert_eq!(parsed_or("DOCRENAME_LINE_BUDGET", Some(" 4 ".into()), 10usize), 4);
        assert_eq!(parsed_or("DOCRENAME_LINE_BUDGET", None, 10usize), 10);
        assert_eq!(
            parsed_or(
                "DOCRENAME_COLLISION_POLICY",
                Some("segmnt".into()),
                CollisionPolicy::Suffix
            ),
            CollisionPolicy::Suffix
        );
    }

    #[test]
    fn file_layer_parses_partial_toml() {
        let raw = r#"
            source_folder = "/data/reports"
            extension_filter = "pdf"
            collision_policy = "segment"
        "#;
        let parsed: PartialRenamerConfig = toml::from_str(raw).expect("parse toml");
        let mut cfg = RenamerConfig::default();
        merge_partial(&mut cfg, parsed);
        assert_eq!(cfg.source_folder, PathBuf::from("/data/reports"));
        assert_eq!(cfg.extension_filter, "pdf");
        assert_eq!(cfg.collision_policy, CollisionPolicy::Segment);
        assert_eq!(cfg.line_budget, DEFAULT_LINE_BUDGET);
    }
}
