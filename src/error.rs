//! Error types for the image builders

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    /// A file or folder the build needs is not there.
    #[error("{what} {} does not exist", .path.display())]
    MissingPath { what: &'static str, path: PathBuf },

    /// An external program could not be started or exited non-zero.
    #[error("`{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        BuildError::MissingPath {
            what,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
