use serde::Serialize;
use verse_chat::MatchedVerse;

/// Response payload for /user_msg_Api.
#[derive(Debug, Serialize)]
pub struct UserMsgResponse {
    /// Always `"success"`; errors use the `{"error": ...}` body instead.
    pub status: &'static str,
    pub matched_verse: MatchedVerse,
    pub gemini_response: String,
}
