//! Error types for apple-targets

use std::path::PathBuf;

use crate::types::Platform;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No main app target found for platform {platform}")]
    MissingMainTarget { platform: Platform },

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown extension kind: {0}")]
    UnknownKind(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}
