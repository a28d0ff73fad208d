//! Corpus embedding in batches, with count and dimension checks.

use tracing::{debug, info};

use crate::{embed::EmbeddingsProvider, errors::StoreError, progress::Progress, verse::VerseEntry};

/// Embeds the `eng_meaning` of every verse, keeping corpus order.
///
/// All vectors must share one dimension (taken from the first one).
///
/// # Errors
/// - Provider failures are passed through.
/// - [`StoreError::VectorCountMismatch`] if a batch returns the wrong number of vectors.
/// - [`StoreError::VectorSizeMismatch`] if a vector has a different dimension.
pub fn embed_corpus(
    verses: &[VerseEntry],
    provider: &dyn EmbeddingsProvider,
    batch_size: usize,
    progress: &dyn Progress,
) -> Result<Vec<Vec<f32>>, StoreError> {
    let batch_size = batch_size.max(1);
    info!(
        total = verses.len(),
        batch_size,
        model = provider.model_name(),
        "embedding corpus"
    );
    progress.set_total(verses.len() as u64);

    let mut out: Vec<Vec<f32>> = Vec::with_capacity(verses.len());
    let mut dim: Option<usize> = None;

    for chunk in verses.chunks(batch_size) {
        let texts: Vec<&str> = chunk.iter().map(|v| v.eng_meaning.as_str()).collect();
        let vectors = provider.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(StoreError::VectorCountMismatch {
                got: vectors.len(),
                want: texts.len(),
            });
        }

        for v in vectors {
            let want = *dim.get_or_insert(v.len());
            if v.len() != want || want == 0 {
                return Err(StoreError::VectorSizeMismatch { got: v.len(), want });
            }
            out.push(v);
        }
        progress.advance(chunk.len() as u64, "embedding verses");
    }

    progress.finish("corpus embedded");
    debug!(vectors = out.len(), dim = dim.unwrap_or(0), "corpus embeddings ready");
    Ok(out)
}
