use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the command-line entry points
#[derive(Debug, Error)]
pub enum BlockpadError {
    #[error("No document location: home directory not found. Pass --file <path>.")]
    NoDocumentPath,

    #[error("No saved document at {0}")]
    NothingSaved(PathBuf),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
