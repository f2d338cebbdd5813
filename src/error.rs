use std::path::PathBuf;
use thiserror::Error;

/// Fatal analysis errors.
///
/// Problems with individual files never show up here: they are logged and
/// the file is skipped or analyzed with less information.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid source directory {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    #[error("Failed to write report {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid keep pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Analysis cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
