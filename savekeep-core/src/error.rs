use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SavekeepError {
    #[error("Save file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    DestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Backup record not found: {0}")]
    RecordNotFound(i64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Directory is not writable: {path}: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SavekeepError>;
