use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    ReadError { path: PathBuf, source: std::io::Error },

    #[error("Failed to write {path}: {source}")]
    WriteError { path: PathBuf, source: std::io::Error },

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}
