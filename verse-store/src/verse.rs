//! Core data models used by the library.

use serde::Serialize;

/// One reference passage of the corpus.
///
/// Loaded once at startup and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerseEntry {
    /// Dataset identifier, e.g. `BG2.47`.
    pub id: String,
    pub chapter: u32,
    pub verse: u32,
    /// English meaning of the verse; this is the text that gets embedded.
    pub eng_meaning: String,
}

impl VerseEntry {
    /// `"{id} (Chapter {chapter}, Verse {verse})"`.
    pub fn citation(&self) -> String {
        format!(
            "{} (Chapter {}, Verse {})",
            self.id, self.chapter, self.verse
        )
    }
}

/// Best corpus entry for a query.
#[derive(Clone, Debug, PartialEq)]
pub struct VerseMatch {
    /// Position of the entry in the corpus.
    pub index: usize,
    pub verse: VerseEntry,
    /// Cosine similarity in `[-1, 1]`.
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_format() {
        let v = VerseEntry {
            id: "BG2.47".into(),
            chapter: 2,
            verse: 47,
            eng_meaning: "...".into(),
        };
        assert_eq!(v.citation(), "BG2.47 (Chapter 2, Verse 47)");
    }
}
