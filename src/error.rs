//! Error types for the offer editor.

use std::path::PathBuf;

/// All errors that can occur while editing offers and payouts.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A data file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A data file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A data file does not contain valid JSON for the expected records.
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parser failure.
        source: serde_json::Error,
    },

    /// A document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The terminal could not be read or written.
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Operator input ended before an answer was given.
    #[error("input closed before an answer was given")]
    InputClosed,

    /// An answer could not be read as a finite number.
    #[error("'{input}' is not a valid amount")]
    InvalidAmount {
        /// The text the operator typed.
        input: String,
    },

    /// Storage backend failed for a reason not tied to a file.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, EditorError>;
