//! Verse-grounded chat pipeline.
//!
//! Public API: [`VerseChat::respond`]. It embeds the message, finds the
//! closest verse in the injected [`VerseStore`], composes the conversation
//! for the generator and formats the reply. Generation failures never fail
//! the request; they turn into the fallback reply.

mod api_types;
mod dialogue;
mod error;
mod reply;

pub use api_types::{ChatAnswer, MatchedVerse};
pub use dialogue::{ConversationTurn, Role, compose, grounded_message, round4};
pub use error::ChatError;
pub use reply::{FALLBACK_REPLY, GenerationOutcome, format_gemini_response};

use std::sync::Arc;

use ai_llm_service::ReplyGenerator;
use tracing::{debug, error, info};
use verse_store::VerseStore;

/// Request pipeline over an immutable store and a generator.
#[derive(Clone)]
pub struct VerseChat {
    store: Arc<VerseStore>,
    generator: Arc<dyn ReplyGenerator>,
}

impl VerseChat {
    pub fn new(store: Arc<VerseStore>, generator: Arc<dyn ReplyGenerator>) -> Self {
        Self { store, generator }
    }

    /// Answers one message given the prior conversation.
    ///
    /// The message is trimmed first; an empty result is rejected before any
    /// embedding or generation happens.
    ///
    /// # Errors
    /// - [`ChatError::EmptyInput`] for a blank message.
    /// - [`ChatError::Store`] / [`ChatError::Join`] if matching fails.
    pub async fn respond(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatAnswer, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        info!(len = message.len(), history = history.len(), "chat request");

        // Embedding is blocking model inference.
        let store = Arc::clone(&self.store);
        let query = message.to_owned();
        let matched = tokio::task::spawn_blocking(move || store.best_match(&query)).await??;
        info!(
            id = %matched.verse.id,
            chapter = matched.verse.chapter,
            verse = matched.verse.verse,
            similarity = matched.similarity,
            "matched verse"
        );

        let contents = compose(history, message, &matched);
        debug!(turns = contents.len(), conversation = ?contents, "composed conversation");

        let outcome = GenerationOutcome::from(self.generator.generate(&contents).await);
        if let GenerationOutcome::Unavailable { reason } = &outcome {
            error!(%reason, "generation failed, using fallback reply");
        }

        Ok(ChatAnswer {
            gemini_response: format_gemini_response(&matched.verse, outcome.reply_text()),
            generated: outcome.is_generated(),
            matched_verse: MatchedVerse {
                chapter: matched.verse.chapter,
                verse: matched.verse.verse,
                eng_meaning: matched.verse.eng_meaning,
                similarity: round4(matched.similarity),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{AiLlmError, Content};
    use std::{
        future::Future,
        pin::Pin,
        sync::Mutex,
        time::Duration,
    };
    use verse_store::{EmbeddingsProvider, NoopProgress, StoreError, VerseEntry};

    struct AxisEmbedder;

    impl EmbeddingsProvider for AxisEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError> {
            let t = text.to_lowercase();
            Ok(vec![
                t.matches("soul").count() as f32,
                t.matches("duty").count() as f32,
                0.1,
            ])
        }
        fn model_name(&self) -> &str {
            "axis"
        }
    }

    struct ScriptedGenerator {
        reply: Option<&'static str>,
        seen: Mutex<Vec<Vec<Content>>>,
    }

    impl ReplyGenerator for ScriptedGenerator {
        fn generate<'a>(
            &'a self,
            contents: &'a [Content],
        ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
            self.seen.lock().unwrap().push(contents.to_vec());
            let out = match self.reply {
                Some(r) => Ok(r.to_string()),
                None => Err(AiLlmError::Timeout(Duration::from_secs(60))),
            };
            Box::pin(async move { out })
        }
    }

    fn chat(reply: Option<&'static str>) -> (VerseChat, Arc<ScriptedGenerator>) {
        let verses = vec![
            VerseEntry {
                id: "BG2.20".into(),
                chapter: 2,
                verse: 20,
                eng_meaning: "The soul is never born and never dies.".into(),
            },
            VerseEntry {
                id: "BG3.35".into(),
                chapter: 3,
                verse: 35,
                eng_meaning: "Better is one's own duty, though imperfect.".into(),
            },
        ];
        let store = VerseStore::build(verses, Arc::new(AxisEmbedder), 8, &NoopProgress).unwrap();
        let generator = Arc::new(ScriptedGenerator {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        (VerseChat::new(Arc::new(store), generator.clone()), generator)
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_generation() {
        let (chat, generator) = chat(Some("unused"));
        let err = chat.respond("   \n", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyInput));
        assert!(generator.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn answers_with_matched_verse_and_reply() {
        let (chat, generator) = chat(Some("The self is eternal."));
        let history = vec![ConversationTurn {
            role: Role::User,
            content: "namaste".into(),
        }];
        let ans = chat
            .respond("  What is the nature of the soul?  ", &history)
            .await
            .unwrap();

        assert!(ans.generated);
        assert_eq!((ans.matched_verse.chapter, ans.matched_verse.verse), (2, 20));
        assert!(ans.gemini_response.starts_with("BG2.20 (Chapter 2, Verse 20)\n\n"));
        assert!(ans.gemini_response.contains("\nThe self is eternal.\n"));

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 2);
        assert!(seen[0][1].parts[0].text.starts_with("user msg: What is the nature of the soul?\n"));
    }

    #[tokio::test]
    async fn generation_failure_uses_fallback() {
        let (chat, _) = chat(None);
        let ans = chat.respond("what is my duty", &[]).await.unwrap();

        assert!(!ans.generated);
        assert_eq!(ans.matched_verse.verse, 35);
        assert!(ans.gemini_response.contains(FALLBACK_REPLY));
    }

    #[tokio::test]
    async fn similarity_is_rounded() {
        let (chat, _) = chat(Some("ok"));
        let ans = chat.respond("soul and duty", &[]).await.unwrap();
        let s = ans.matched_verse.similarity;
        assert_eq!(s, (s * 10_000.0).round() / 10_000.0);
        assert!((-1.0..=1.0).contains(&s));
    }
}
