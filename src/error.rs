//! Error types for the box editor.
//!
//! Geometry and interaction code is infallible; errors only come from the
//! filesystem edges of the app: the background image and the config file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading editor resources.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The background image could not be opened or decoded.
    #[error("failed to load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::config::EditorConfig`].
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value is out of range.
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
