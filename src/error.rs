use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while turning a document into text units.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid docx container: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed document xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("document part missing: {0}")]
    MissingPart(&'static str),
    #[error("pdf could not be read: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Fatal errors for a rename run. Per-file skips are outcomes, not errors.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("unsupported document extension `{0}` (expected `docx` or `pdf`)")]
    UnsupportedExtension(String),
    #[error("spreadsheet {path} unreadable: {reason}")]
    Spreadsheet { path: PathBuf, reason: String },
    #[error("spreadsheet {path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: String },
    #[error("failed to read document {path}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error("io failure on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write status output")]
    Output(#[source] std::io::Error),
    #[error("no free file name for {stem} after {attempts} attempts")]
    CollisionUnresolved { stem: String, attempts: usize },
}

impl RenameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
