use crate::api::{ChatBackend, ChatClient};
use crate::conversation::Conversation;
use crate::events::ExchangeOutcome;
use crate::ui::conversation::commands::{SlashCommand, get_help_text};
use crate::ui::conversation::composer::{ChatComposer, ComposerResult};
use crate::ui::conversation::history::ChatLog;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
};
use tokio::sync::mpsc;

/// Footer hint shown when nothing more urgent occupies the status line.
const FOOTER_HINT: &str =
    "먼저는 문서 기반으로 답하고, 필요하면 /web 으로 최신 웹 검색 보완을 받을 수 있어요";

/// Actions the manager asks the event loop to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
    SaveTranscript,
}

/// Glues the conversation state, the composer, and the chat client together
/// for the TUI. Requests run on background tasks; their outcomes come back
/// through the channel and are drained before each redraw.
pub struct ConversationManager {
    conversation: Conversation,
    composer: ChatComposer,
    client: ChatClient,
    outcome_tx: mpsc::UnboundedSender<ExchangeOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<ExchangeOutcome>,
    notice: Option<String>,
    tick: u64,
}

impl ConversationManager {
    pub fn new(client: ChatClient) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            conversation: Conversation::new(),
            composer: ChatComposer::new(),
            client,
            outcome_tx,
            outcome_rx,
            notice: None,
            tick: 0,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Drain finished exchanges into the conversation (called before each
    /// redraw).
    pub fn process_outcomes(&mut self) {
        while let Ok(finished) = self.outcome_rx.try_recv() {
            self.conversation
                .complete(&finished.placeholder_id, finished.outcome);
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ConversationAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return ConversationAction::Exit;
        }

        match self.composer.handle_key(key) {
            ComposerResult::Submitted(text) => {
                self.submit(text);
                ConversationAction::None
            }
            ComposerResult::Command(command) => self.handle_slash_command(command),
            ComposerResult::None => ConversationAction::None,
        }
    }

    /// Start a first-pass exchange, or explain why nothing happened.
    fn submit(&mut self, text: String) {
        self.notice = None;
        if self.conversation.is_pending() {
            // Rejected, not queued: give the text back instead of dropping it.
            self.composer.restore(text);
            self.set_notice("이전 답변을 기다리는 중이에요…");
            return;
        }
        if let Some(pending) = self.conversation.begin_submit(&text) {
            self.dispatch(pending.question.clone(), pending.use_web, pending.placeholder_id);
        }
    }

    fn handle_slash_command(&mut self, command: SlashCommand) -> ConversationAction {
        self.notice = None;
        match command {
            SlashCommand::Web => {
                if self.conversation.is_pending() {
                    self.set_notice("이전 답변을 기다리는 중이에요…");
                } else if let Some(pending) = self.conversation.begin_enhance() {
                    self.dispatch(
                        pending.question.clone(),
                        pending.use_web,
                        pending.placeholder_id,
                    );
                } else {
                    self.set_notice("보완할 질문이 없어요. 먼저 질문을 보내주세요.");
                }
                ConversationAction::None
            }
            SlashCommand::Save => ConversationAction::SaveTranscript,
            SlashCommand::Clear => {
                self.conversation = Conversation::new();
                self.set_notice("새 대화를 시작했어요.");
                ConversationAction::None
            }
            SlashCommand::Help => {
                self.set_notice(get_help_text());
                ConversationAction::None
            }
            SlashCommand::Quit => ConversationAction::Exit,
        }
    }

    /// Run the exchange on a background task; the outcome returns through the
    /// channel tagged with the placeholder it resolves.
    fn dispatch(&self, question: String, use_web: bool, placeholder_id: String) {
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = client.send_message(&question, use_web).await;
            let _ = tx.send(ExchangeOutcome {
                placeholder_id,
                outcome,
            });
        });
    }

    /// Render the chat screen: log, status line, composer.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(frame.size());

        frame.render_widget(ChatLog::new(&self.conversation, self.tick), chunks[0]);

        let status = self.status_line();
        frame.render_widget(
            ratatui::widgets::Paragraph::new(status),
            chunks[1],
        );

        frame.render_widget(&self.composer, chunks[2]);

        // Terminal cursor inside the composer
        frame.set_cursor(
            chunks[2].x + 1 + self.composer.cursor_offset(),
            chunks[2].y + 1,
        );
    }

    fn status_line(&self) -> Line<'_> {
        if let Some(notice) = &self.notice {
            return Line::from(Span::styled(
                notice.as_str(),
                Style::default().fg(Color::Cyan),
            ));
        }

        let hints = self.composer.matching_commands();
        if !hints.is_empty() {
            let summary = hints
                .iter()
                .map(|entry| format!("/{} {}", entry.keyword, entry.description))
                .collect::<Vec<_>>()
                .join("  ·  ");
            return Line::from(Span::styled(summary, Style::default().fg(Color::Cyan)));
        }

        Line::from(Span::styled(
            FOOTER_HINT,
            Style::default().fg(Color::DarkGray),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn manager() -> ConversationManager {
        ConversationManager::new(ChatClient::new(&Config::default()))
    }

    fn press(m: &mut ConversationManager, code: KeyCode) -> ConversationAction {
        m.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(m: &mut ConversationManager, text: &str) {
        for c in text.chars() {
            press(m, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn ctrl_c_exits() {
        let mut m = manager();
        let action = m.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action, ConversationAction::Exit);
    }

    #[tokio::test]
    async fn quit_command_exits() {
        let mut m = manager();
        type_text(&mut m, "/quit");
        assert_eq!(press(&mut m, KeyCode::Enter), ConversationAction::Exit);
    }

    #[tokio::test]
    async fn submit_appends_user_message_and_placeholder() {
        let mut m = manager();
        type_text(&mut m, "자립지원제도 알려줘");
        press(&mut m, KeyCode::Enter);

        assert!(m.conversation().is_pending());
        assert_eq!(m.conversation().messages().len(), 3);
    }

    #[tokio::test]
    async fn submit_while_pending_keeps_composer_content() {
        let mut m = manager();
        type_text(&mut m, "첫 질문");
        press(&mut m, KeyCode::Enter);

        type_text(&mut m, "둘째 질문");
        press(&mut m, KeyCode::Enter);

        assert_eq!(m.composer.content(), "둘째 질문");
        assert_eq!(m.conversation().messages().len(), 3);
        assert!(m.notice.is_some());
    }

    #[tokio::test]
    async fn web_command_without_question_sets_notice() {
        let mut m = manager();
        type_text(&mut m, "/web");
        assert_eq!(press(&mut m, KeyCode::Enter), ConversationAction::None);
        assert!(!m.conversation().is_pending());
        assert!(m.notice.as_deref().unwrap_or_default().contains("질문"));
    }

    #[tokio::test]
    async fn save_command_requests_transcript_save() {
        let mut m = manager();
        type_text(&mut m, "/save");
        assert_eq!(
            press(&mut m, KeyCode::Enter),
            ConversationAction::SaveTranscript
        );
    }

    #[tokio::test]
    async fn clear_starts_a_fresh_conversation() {
        let mut m = manager();
        type_text(&mut m, "질문");
        press(&mut m, KeyCode::Enter);

        type_text(&mut m, "/clear");
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.conversation().messages().len(), 1);
        assert!(!m.conversation().is_pending());
    }

    #[tokio::test]
    async fn outcome_for_cleared_conversation_is_dropped() {
        let mut m = manager();
        type_text(&mut m, "질문");
        press(&mut m, KeyCode::Enter);
        let placeholder_id = m
            .conversation()
            .pending()
            .unwrap()
            .placeholder_id
            .clone();

        type_text(&mut m, "/clear");
        press(&mut m, KeyCode::Enter);

        m.outcome_tx
            .send(crate::events::ExchangeOutcome {
                placeholder_id,
                outcome: Ok("늦게 도착한 답변".to_string()),
            })
            .unwrap();
        m.process_outcomes();

        assert_eq!(m.conversation().messages().len(), 1);
    }
}
