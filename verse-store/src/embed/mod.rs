//! Embedding abstraction.

use crate::errors::StoreError;

pub mod fastembed_embedder;

/// Provider interface for embedding generation.
///
/// Implementations are blocking (local model inference); async callers run
/// them on the blocking pool. The same text must always map to the same
/// vector for a given model.
pub trait EmbeddingsProvider: Send + Sync {
    /// Produces an embedding vector for the given text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError>;

    /// Embeds several texts; output order matches input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StoreError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Name of the underlying model, for logs.
    fn model_name(&self) -> &str;
}
