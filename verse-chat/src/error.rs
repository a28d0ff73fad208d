//! Typed error for the verse-chat crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The message is missing or whitespace only.
    #[error("empty input")]
    EmptyInput,

    /// Embedding or matching failed.
    #[error("verse store error: {0}")]
    Store(#[from] verse_store::StoreError),

    /// The blocking matcher task panicked or was cancelled.
    #[error("matcher task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
