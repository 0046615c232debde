//! Error types for the content sync

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Non-success response from the CMS API
    #[error("Webflow API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan documents: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl SyncError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
