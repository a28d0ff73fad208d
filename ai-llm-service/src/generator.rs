use std::{future::Future, pin::Pin};

use crate::{chat_content::Content, error_handler::AiLlmError};

/// Reply generation seam.
///
/// Implemented by [`crate::GeminiService`]; tests plug in their own
/// generators so no network is needed.
pub trait ReplyGenerator: Send + Sync {
    /// Sends the whole conversation and returns the trimmed reply text.
    fn generate<'a>(
        &'a self,
        contents: &'a [Content],
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;
}
