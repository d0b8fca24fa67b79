use crate::api::ChatBackend;
use crate::conversation::Conversation;

/// Sequential conversation controller: owns the chat state and a backend and
/// drives one exchange at a time. Request failures never escape; they are
/// rendered inline as assistant text.
pub struct ChatSession<B> {
    conversation: Conversation,
    backend: B,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            conversation: Conversation::new(),
            backend,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Send a question through the backend. A no-op for empty input or while
    /// a request is pending.
    pub async fn submit_question(&mut self, text: &str) {
        let Some(pending) = self.conversation.begin_submit(text) else {
            return;
        };

        let outcome = self
            .backend
            .send_message(&pending.question, pending.use_web)
            .await;
        self.conversation.complete(&pending.placeholder_id, outcome);
    }

    /// Replay the last answered question with web enhancement enabled. A
    /// no-op if nothing was asked yet or a request is pending.
    pub async fn enhance_with_web_search(&mut self) {
        let Some(pending) = self.conversation.begin_enhance() else {
            return;
        };

        let outcome = self
            .backend
            .send_message(&pending.question, pending.use_web)
            .await;
        self.conversation.complete(&pending.placeholder_id, outcome);
    }
}
