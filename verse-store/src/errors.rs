//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for verse-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The corpus file could not be opened.
    #[error("cannot open corpus file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (bad row, non-integer chapter/verse, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required header column is absent.
    #[error("corpus is missing required column `{0}`")]
    MissingColumn(&'static str),

    /// The corpus has no rows; nothing could ever be matched.
    #[error("corpus is empty")]
    EmptyCorpus,

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The embedding model could not be loaded.
    #[error("failed to load embedding model `{model}`: {reason}")]
    ModelLoad { model: String, reason: String },

    /// The embedding model failed on some input.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// The provider returned a different number of vectors than texts.
    #[error("vector count mismatch: got {got}, want {want}")]
    VectorCountMismatch { got: usize, want: usize },
}
