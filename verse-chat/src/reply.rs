//! Generation outcome and final reply formatting.

use ai_llm_service::AiLlmError;
use verse_store::VerseEntry;

/// Reply shown when the generator could not produce text.
pub const FALLBACK_REPLY: &str = "Could not generate response from Gemini.";

const SEPARATOR: &str = "─────────────────────────────────";

/// Result of the generation step. Never an error for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    /// `reason` is for server logs only.
    Unavailable { reason: String },
}

impl GenerationOutcome {
    pub fn reply_text(&self) -> &str {
        match self {
            GenerationOutcome::Generated(text) => text,
            GenerationOutcome::Unavailable { .. } => FALLBACK_REPLY,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated(_))
    }
}

impl From<Result<String, AiLlmError>> for GenerationOutcome {
    fn from(res: Result<String, AiLlmError>) -> Self {
        match res {
            Ok(text) => GenerationOutcome::Generated(text),
            Err(e) => GenerationOutcome::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Citation, verse text and the reply framed by separators.
pub fn format_gemini_response(verse: &VerseEntry, reply: &str) -> String {
    format!(
        "{}\n\n{}\n{SEPARATOR}\n{}\n{SEPARATOR}",
        verse.citation(),
        verse.eng_meaning,
        reply
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn failure_renders_fallback() {
        let o = GenerationOutcome::from(Err::<String, _>(AiLlmError::Timeout(Duration::from_secs(60))));
        assert!(!o.is_generated());
        assert_eq!(o.reply_text(), FALLBACK_REPLY);
        match o {
            GenerationOutcome::Unavailable { reason } => assert!(reason.contains("timed out")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn response_block_layout() {
        let v = VerseEntry {
            id: "BG2.47".into(),
            chapter: 2,
            verse: 47,
            eng_meaning: "Act without attachment.".into(),
        };
        assert_eq!(
            format_gemini_response(&v, "Do your work."),
            "BG2.47 (Chapter 2, Verse 47)\n\nAct without attachment.\n\
             ─────────────────────────────────\nDo your work.\n\
             ─────────────────────────────────"
        );
    }
}
