//! In-memory verse corpus with local sentence embeddings.
//!
//! The corpus is read from CSV and embedded once at startup; afterwards the
//! store is read-only and every query is a linear cosine scan:
//! - [`VerseStore::open`] loads the CSV, the embedding model and the corpus vectors
//! - [`VerseStore::best_match`] embeds a query and returns the closest verse
//!
//! Embedding is blocking CPU/GPU work; async callers should run the store's
//! methods on the blocking pool.

mod config;
mod embed;
mod embed_pool;
mod errors;
mod io_csv;
mod progress;
mod similarity;
mod verse;

pub use config::{DeviceKind, StoreConfig};
pub use embed::EmbeddingsProvider;
pub use embed::fastembed_embedder::{FastEmbedder, ResolvedDevice};
pub use errors::StoreError;
pub use io_csv::{read_verses, read_verses_from};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use similarity::{best_match, cosine};
pub use verse::{VerseEntry, VerseMatch};

use std::sync::Arc;

use tracing::{debug, info, trace};

/// Immutable corpus plus its cached embeddings.
///
/// Construct once, share behind an `Arc`.
pub struct VerseStore {
    verses: Vec<VerseEntry>,
    vectors: Vec<Vec<f32>>,
    dim: usize,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl std::fmt::Debug for VerseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerseStore")
            .field("verses", &self.verses.len())
            .field("dim", &self.dim)
            .field("model", &self.embedder.model_name())
            .finish()
    }
}

impl VerseStore {
    /// Loads the CSV, the configured model and embeds the whole corpus.
    ///
    /// # Errors
    /// Any config, CSV, model-load or embedding failure.
    pub fn open(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;
        let verses = io_csv::read_verses(&cfg.csv_path)?;
        let fast = FastEmbedder::load(cfg)?;
        info!(model = %cfg.model_name, device = %fast.device(), "embedding model loaded");
        let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(fast);
        let progress = progress::for_terminal(verses.len() as u64);
        Self::build(verses, embedder, cfg.batch_size, progress.as_ref())
    }

    /// Embeds `verses` with `embedder` and builds the store.
    ///
    /// # Errors
    /// [`StoreError::EmptyCorpus`] for no verses, plus embedding failures.
    pub fn build(
        verses: Vec<VerseEntry>,
        embedder: Arc<dyn EmbeddingsProvider>,
        batch_size: usize,
        progress: &dyn Progress,
    ) -> Result<Self, StoreError> {
        if verses.is_empty() {
            return Err(StoreError::EmptyCorpus);
        }
        let vectors = embed_pool::embed_corpus(&verses, embedder.as_ref(), batch_size, progress)?;
        Self::from_parts(verses, vectors, embedder)
    }

    /// Builds a store from precomputed vectors (one per verse, same order).
    ///
    /// # Errors
    /// - [`StoreError::EmptyCorpus`] for no verses.
    /// - [`StoreError::VectorCountMismatch`] if counts differ.
    /// - [`StoreError::VectorSizeMismatch`] if dimensions are not uniform.
    pub fn from_parts(
        verses: Vec<VerseEntry>,
        vectors: Vec<Vec<f32>>,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, StoreError> {
        if verses.is_empty() {
            return Err(StoreError::EmptyCorpus);
        }
        if vectors.len() != verses.len() {
            return Err(StoreError::VectorCountMismatch {
                got: vectors.len(),
                want: verses.len(),
            });
        }
        let dim = vectors[0].len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim || v.is_empty()) {
            return Err(StoreError::VectorSizeMismatch {
                got: bad.len(),
                want: dim,
            });
        }

        info!(
            verses = verses.len(),
            dim,
            model = embedder.model_name(),
            "verse store ready"
        );
        Ok(Self {
            verses,
            vectors,
            dim,
            embedder,
        })
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Always `false` for a constructed store.
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Embeds `query` and returns the closest verse.
    ///
    /// # Errors
    /// Embedding failures, or a query vector of the wrong dimension.
    pub fn best_match(&self, query: &str) -> Result<VerseMatch, StoreError> {
        trace!(query_len = query.len(), "VerseStore::best_match");
        let qv = self.embedder.embed(query)?;
        self.match_vector(&qv)
    }

    /// Returns the verse closest to an already embedded query.
    ///
    /// # Errors
    /// [`StoreError::VectorSizeMismatch`] if `query` has the wrong dimension.
    pub fn match_vector(&self, query: &[f32]) -> Result<VerseMatch, StoreError> {
        if query.len() != self.dim {
            return Err(StoreError::VectorSizeMismatch {
                got: query.len(),
                want: self.dim,
            });
        }
        let (index, similarity) =
            similarity::best_match(query, &self.vectors).ok_or(StoreError::EmptyCorpus)?;
        let verse = self.verses[index].clone();
        debug!(index, id = %verse.id, similarity, "best verse match");
        Ok(VerseMatch {
            index,
            verse,
            similarity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bag-of-keywords embedder: one axis per keyword.
    struct KeywordEmbedder;

    const AXES: [&str; 3] = ["soul", "duty", "mind"];

    impl EmbeddingsProvider for KeywordEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError> {
            let lower = text.to_lowercase();
            Ok(AXES
                .iter()
                .map(|k| lower.matches(k).count() as f32)
                .collect())
        }
        fn model_name(&self) -> &str {
            "keywords"
        }
    }

    fn entry(id: &str, chapter: u32, verse: u32, text: &str) -> VerseEntry {
        VerseEntry {
            id: id.into(),
            chapter,
            verse,
            eng_meaning: text.into(),
        }
    }

    fn corpus() -> Vec<VerseEntry> {
        vec![
            entry("BG2.20", 2, 20, "The soul is never born and never dies."),
            entry("BG2.47", 2, 47, "Your duty is to act, never the fruits of duty."),
            entry("BG6.35", 6, 35, "The mind is restless, but it is controlled by practice."),
        ]
    }

    fn store() -> VerseStore {
        VerseStore::build(corpus(), Arc::new(KeywordEmbedder), 2, &NoopProgress).unwrap()
    }

    #[test]
    fn finds_the_closest_verse() {
        let s = store();
        assert_eq!(s.len(), 3);
        assert_eq!(s.dimension(), 3);

        let m = s.best_match("What is the nature of the soul?").unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.verse.id, "BG2.20");
        assert!((m.similarity - 1.0).abs() < 1e-6);

        let m = s.best_match("how do I calm my mind").unwrap();
        assert_eq!((m.verse.chapter, m.verse.verse), (6, 35));
    }

    #[test]
    fn unrelated_query_still_matches_something() {
        let m = store().best_match("hello there").unwrap();
        assert!(m.index < 3);
        assert_eq!(m.similarity, 0.0);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = VerseStore::build(vec![], Arc::new(KeywordEmbedder), 8, &NoopProgress).unwrap_err();
        assert!(matches!(err, StoreError::EmptyCorpus));
    }

    #[test]
    fn from_parts_validates_shape() {
        let err = VerseStore::from_parts(corpus(), vec![vec![1.0]], Arc::new(KeywordEmbedder))
            .unwrap_err();
        assert!(matches!(err, StoreError::VectorCountMismatch { got: 1, want: 3 }));

        let err = VerseStore::from_parts(
            corpus(),
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0]],
            Arc::new(KeywordEmbedder),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::VectorSizeMismatch { got: 1, want: 2 }));
    }

    #[test]
    fn query_dimension_must_match() {
        let err = store().match_vector(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, StoreError::VectorSizeMismatch { got: 2, want: 3 }));
    }
}
