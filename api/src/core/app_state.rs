use verse_chat::VerseChat;

/// Shared state for all HTTP handlers.
///
/// Built once at startup after the corpus and model are ready.
#[derive(Clone)]
pub struct AppState {
    /// Verse matching + reply generation pipeline.
    pub chat: VerseChat,
}

impl AppState {
    pub fn new(chat: VerseChat) -> Self {
        Self { chat }
    }
}
