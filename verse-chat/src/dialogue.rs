//! Conversation history parsing and prompt composition.

use ai_llm_service::{Content, ContentRole};
use serde::Deserialize;
use tracing::warn;
use verse_store::VerseMatch;

/// Speaker of a history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Role {
    User,
    Model,
}

/// Only the exact string `"user"` is the user; everything else speaks as the model.
impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" => Role::User,
            "model" | "assistant" | "ai" => Role::Model,
            _ => {
                warn!(role = %raw, "unrecognised history role, treating as model");
                Role::Model
            }
        }
    }
}

impl From<Role> for ContentRole {
    fn from(r: Role) -> Self {
        match r {
            Role::User => ContentRole::User,
            Role::Model => ContentRole::Model,
        }
    }
}

/// One prior turn supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

/// Rounds a similarity score to 4 decimal places.
pub fn round4(x: f32) -> f64 {
    (f64::from(x) * 10_000.0).round() / 10_000.0
}

/// Text of the synthesized turn carrying the message and its matched verse.
pub fn grounded_message(message: &str, m: &VerseMatch) -> String {
    format!(
        "user msg: {}\n\n{}\n\n{}\n\nSimilarity Score: {}",
        message,
        m.verse.citation(),
        m.verse.eng_meaning,
        round4(m.similarity)
    )
}

/// Builds the conversation sent to the generator: the history in order,
/// followed by exactly one new user turn grounded on `m`.
pub fn compose(history: &[ConversationTurn], message: &str, m: &VerseMatch) -> Vec<Content> {
    let mut out: Vec<Content> = history
        .iter()
        .map(|t| Content::text(t.role.into(), t.content.clone()))
        .collect();
    out.push(Content::text(ContentRole::User, grounded_message(message, m)));
    out
}
