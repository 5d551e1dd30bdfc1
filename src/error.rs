//! Error types for loading and exporting

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the export pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// The library database is malformed or missing required fields
    #[error("failed to parse library {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A playlist references a track id that the library does not contain
    #[error("playlist '{playlist}' references unknown track id {track_id}")]
    Reference { playlist: String, track_id: String },

    /// Reading, writing or copying a file failed
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
