//! Document persistence
//!
//! The whole document is stored as one JSON snapshot and rewritten in full
//! after every content change.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::config_dir;
use crate::document::{Document, DocumentSnapshot};

const DOCUMENT_FILE: &str = "document.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/blockpad/document.json`
    pub fn default_location() -> Option<PathBuf> {
        config_dir().map(|p| p.join(DOCUMENT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored document, or the welcome document when nothing usable is stored
    pub fn load(&self) -> Document {
        match self.load_snapshot() {
            Ok(Some(snapshot)) => Document::from_snapshot(snapshot),
            Ok(None) => Document::welcome(),
            Err(e) => {
                log::warn!("Ignoring stored document: {}", e);
                Document::welcome()
            }
        }
    }

    pub fn load_snapshot(&self) -> Result<Option<DocumentSnapshot>, StorageError> {
        match self.load_raw()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Raw stored JSON; `None` when the file does not exist
    pub fn load_raw(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Write the snapshot to a sibling temp file, then rename over the target
    pub fn save(&self, document: &Document) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&document.to_snapshot())?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        log::debug!("Saved document to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored document. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool, StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod storage_tests;
