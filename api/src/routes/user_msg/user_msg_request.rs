use serde::Deserialize;
use serde_json::Value;
use verse_chat::ConversationTurn;

/// Request payload for /user_msg_Api.
#[derive(Debug, Deserialize)]
pub struct UserMsgRequest {
    /// Free-text question. Missing or `null` counts as empty.
    #[serde(default)]
    pub message: Option<String>,
    /// Prior turns, oldest first. Kept raw so a malformed history is told
    /// apart from a missing message.
    #[serde(default)]
    pub history: Value,
}

impl UserMsgRequest {
    /// Parses `history`; missing or `null` means no prior turns.
    pub fn turns(&self) -> Result<Vec<ConversationTurn>, serde_json::Error> {
        match &self.history {
            Value::Null => Ok(Vec::new()),
            raw => Vec::<ConversationTurn>::deserialize(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> UserMsgRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn missing_or_null_history_is_empty() {
        assert!(request(json!({ "message": "q" })).turns().unwrap().is_empty());
        assert!(request(json!({ "message": "q", "history": null })).turns().unwrap().is_empty());
    }

    #[test]
    fn malformed_history_is_an_error() {
        assert!(request(json!({ "history": [{ "content": "x" }] })).turns().is_err());
        assert!(request(json!({ "history": "oops" })).turns().is_err());
    }
}
