use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid report pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Report {} could not be read: {reason}", path.display())]
    MalformedReport { path: PathBuf, reason: String },

    #[error("No duplicate list found in {}! Run the scan first to generate one.", dir.display())]
    NoReport { dir: PathBuf },
}
