use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed source data: {0}")]
    Format(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Dictionary store not found at {}; run a refresh first", .0.display())]
    StoreNotFound(PathBuf),

    #[error("Dictionary store is corrupted: {0}; run a refresh first")]
    StoreCorruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether the caller has to rebuild the cache before retrying.
    #[must_use]
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Error::StoreNotFound(_) | Error::StoreCorruption(_))
    }
}
