//! Conversation shapes accepted by Gemini `generateContent`.

use serde::{Deserialize, Serialize};

/// Role of a content block as understood by Gemini.
///
/// Gemini only knows two conversational roles; anything that is not the
/// user speaks as the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

/// A single text part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One turn of the conversation: `{ "role": ..., "parts": [{ "text": ... }] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

impl Content {
    /// Builds a single-part text turn.
    pub fn text(role: ContentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_gemini_shape() {
        let c = Content::text(ContentRole::Model, "hello");
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({ "role": "model", "parts": [{ "text": "hello" }] })
        );
    }
}
