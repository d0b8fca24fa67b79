//! Conversation state: the ordered message list, the single in-flight
//! exchange, and the remembered question for web-search enhancement.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Greeting seeded into every new conversation.
pub const WELCOME_TEXT: &str = "안녕하세요! 🌿 NeStep 챗봇입니다. 무엇을 도와드릴까요?";

/// Placeholder shown while a first-pass answer is pending.
pub const TYPING_TEXT: &str = "답변 작성 중…";

/// Placeholder shown while a web-enhanced answer is pending.
pub const WEB_TYPING_TEXT: &str = "웹 검색으로 보완 중…";

/// Follow-up bubble offering web-search enhancement.
pub const OFFER_TEXT: &str = "필요하면 🔎 최신 웹 검색으로 보완해 드릴까요?";

/// Prefix for request failures surfaced inline.
pub const ERROR_PREFIX: &str = "오류";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single chat bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    /// Marks the follow-up bubble that offers web-search enhancement
    #[serde(default)]
    pub offers_web_search: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            offers_web_search: false,
            timestamp: Utc::now(),
        }
    }
}

/// The exchange currently in flight: which placeholder bubble it resolves
/// into, what was asked, and whether web enhancement was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    pub placeholder_id: String,
    pub question: String,
    pub use_web: bool,
}

/// Ordered chat state. Mutation happens only through the entry points below;
/// at most one exchange is pending at a time, and completion must name the
/// placeholder it resolves.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    pending: Option<PendingExchange>,
    last_question: Option<String>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let mut welcome = Message::new(Sender::Assistant, WELCOME_TEXT);
        welcome.id = "welcome".to_string();

        Self {
            messages: vec![welcome],
            pending: None,
            last_question: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingExchange> {
        self.pending.as_ref()
    }

    pub fn last_question(&self) -> Option<&str> {
        self.last_question.as_deref()
    }

    /// Start a first-pass exchange: append the user bubble and a typing
    /// placeholder, and mark the exchange pending. Returns `None` (no state
    /// change) for empty input or while another exchange is in flight.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingExchange> {
        let question = text.trim();
        if question.is_empty() || self.pending.is_some() {
            return None;
        }

        self.messages.push(Message::new(Sender::User, question));
        self.begin_exchange(question.to_string(), false, TYPING_TEXT)
    }

    /// Start a web-enhancement exchange replaying the last answered question.
    /// Appends only a placeholder bubble; no new user message. Returns `None`
    /// if nothing was asked yet or an exchange is in flight.
    pub fn begin_enhance(&mut self) -> Option<PendingExchange> {
        if self.pending.is_some() {
            return None;
        }
        let question = self.last_question.clone()?;
        self.begin_exchange(question, true, WEB_TYPING_TEXT)
    }

    fn begin_exchange(
        &mut self,
        question: String,
        use_web: bool,
        placeholder_text: &str,
    ) -> Option<PendingExchange> {
        let placeholder = Message::new(Sender::Assistant, placeholder_text);
        let pending = PendingExchange {
            placeholder_id: placeholder.id.clone(),
            question,
            use_web,
        };

        self.messages.push(placeholder);
        self.pending = Some(pending.clone());
        Some(pending)
    }

    /// Resolve the pending exchange. The reply (or an inline error) replaces
    /// the placeholder text; a successful first pass remembers the question
    /// and appends the web-search offer bubble. Outcomes for a placeholder
    /// that is no longer pending are dropped.
    pub fn complete(&mut self, placeholder_id: &str, outcome: Result<String>) {
        let Some(pending) = self.pending.take_if(|p| p.placeholder_id == placeholder_id)
        else {
            tracing::warn!(placeholder_id, "dropping outcome for stale placeholder");
            return;
        };

        let Some(placeholder) = self
            .messages
            .iter_mut()
            .find(|m| m.id == pending.placeholder_id)
        else {
            return;
        };

        match outcome {
            Ok(reply) => {
                placeholder.text = reply;
                if !pending.use_web {
                    self.last_question = Some(pending.question);
                    let mut offer = Message::new(Sender::Assistant, OFFER_TEXT);
                    offer.offers_web_search = true;
                    self.messages.push(offer);
                }
            }
            Err(error) => {
                tracing::error!(error = %error, "chat request failed");
                placeholder.text = format!("{}: {:#}", ERROR_PREFIX, error);
            }
        }
    }
}
