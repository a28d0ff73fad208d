//! Public result types re-used by the HTTP layer.

use serde::Serialize;

/// Matched verse as returned to clients.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchedVerse {
    pub chapter: u32,
    pub verse: u32,
    pub eng_meaning: String,
    /// Cosine similarity rounded to 4 decimal places.
    pub similarity: f64,
}

/// Outcome of one chat request.
#[derive(Clone, Debug)]
pub struct ChatAnswer {
    pub matched_verse: MatchedVerse,
    /// Formatted block: citation, verse text and the (generated or fallback) reply.
    pub gemini_response: String,
    /// `false` when the fallback reply was used.
    pub generated: bool,
}
