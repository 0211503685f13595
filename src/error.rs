use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all operations in the `zbasket` crate.
#[derive(Error, Debug)]
pub enum ArchiverError {
    /// An input file or root does not exist or cannot be read.
    /// Fails the enclosing basket.
    #[error("Input not found or unreadable '{}': {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid tuning values. Raised before any I/O happens.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The output directory is missing or a write into it failed. Always fatal for a run.
    #[error("Cannot write output '{}': {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compressor or decompressor rejected its input.
    #[error("Codec error: {0}")]
    Codec(#[source] std::io::Error),

    /// A member filename that cannot round-trip through a newline-joined manifest.
    #[error("Invalid member name: {0:?}")]
    InvalidMemberName(String),

    /// The decompressed blob does not split into as many members as the manifest lists.
    #[error("Separator mismatch: manifest lists {expected} members but the archive splits into {found}")]
    SeparatorMismatch { expected: usize, found: usize },

    /// Directory traversal failed below the root.
    #[error("Walk error under '{}': {message}", path.display())]
    Walk { path: PathBuf, message: String },
}

impl ArchiverError {
    /// Errors that only concern the basket being processed. Anything else ends the run.
    pub fn is_basket_local(&self) -> bool {
        matches!(
            self,
            ArchiverError::InputNotFound { .. } | ArchiverError::InvalidMemberName(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ArchiverError>;
