//! File attachment block
//!
//! A card showing a file's title and size with open / replace / delete
//! actions. Picking a file reads its metadata from disk; nothing is uploaded.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Title shown when a file block has none
pub const DEFAULT_TITLE: &str = "My file";

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl FileData {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn display_size(&self) -> &str {
        self.size.as_deref().unwrap_or("")
    }

    /// Data as persisted: a missing title falls back to the default
    pub fn save(&self) -> FileData {
        FileData {
            title: Some(self.display_title().to_string()),
            size: Some(self.display_size().to_string()),
            href: self.href.clone(),
        }
    }

    /// Label of the pick button: "Replace" once a file is attached
    pub fn pick_label(&self) -> &'static str {
        if self.href.is_some() {
            "Replace"
        } else {
            "Pick file"
        }
    }
}

/// Read a file's metadata into block data
pub fn pick(path: &Path) -> io::Result<FileData> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a file: {}", path.display()),
        ));
    }
    let absolute = fs::canonicalize(path)?;
    let title = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Ok(FileData {
        title: Some(title),
        href: Some(format!("file://{}", absolute.display())),
        size: Some(human_size(metadata.len())),
    })
}

/// Human-readable byte size with up to two decimals, e.g. `1.5 KB`
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut exponent = 0;
    while exponent + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let scaled = bytes as f64 / 1024u64.pow(exponent as u32) as f64;
    let rounded = format!("{:.2}", scaled);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[exponent])
}
