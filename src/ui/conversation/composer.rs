use crate::ui::conversation::commands::{CommandEntry, SlashCommand, command_entries, parse_slash_command};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Placeholder shown while the composer is empty.
const INPUT_PLACEHOLDER: &str = "메시지를 입력하세요 (예: 최신 자립지원제도 알려줘)";

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq, Eq)]
pub enum ComposerResult {
    Submitted(String),
    Command(SlashCommand),
    None,
}

/// Single-line input composer with slash-command hints
pub struct ChatComposer {
    content: String,
    /// Cursor position in characters, not bytes
    cursor: usize,
    command_entries: Vec<CommandEntry>,
}

impl ChatComposer {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            command_entries: command_entries(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Put text back into the composer (used when a submit is rejected while
    /// a request is pending).
    pub fn restore(&mut self, content: String) {
        self.cursor = content.chars().count();
        self.content = content;
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if self.content.trim().is_empty() {
                    return ComposerResult::None;
                }
                let content = std::mem::take(&mut self.content);
                self.cursor = 0;
                if let Some(command) = parse_slash_command(&content) {
                    ComposerResult::Command(command)
                } else {
                    ComposerResult::Submitted(content)
                }
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let byte_pos = char_to_byte_index(&self.content, self.cursor);
                    self.content.remove(byte_pos);
                }
                ComposerResult::None
            }
            KeyCode::Delete => {
                if self.cursor < self.content.chars().count() {
                    let byte_pos = char_to_byte_index(&self.content, self.cursor);
                    self.content.remove(byte_pos);
                }
                ComposerResult::None
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                ComposerResult::None
            }
            KeyCode::Right => {
                if self.cursor < self.content.chars().count() {
                    self.cursor += 1;
                }
                ComposerResult::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                ComposerResult::None
            }
            KeyCode::End => {
                self.cursor = self.content.chars().count();
                ComposerResult::None
            }
            KeyCode::Esc => {
                self.content.clear();
                self.cursor = 0;
                ComposerResult::None
            }
            KeyCode::Char(c) => {
                let byte_pos = char_to_byte_index(&self.content, self.cursor);
                self.content.insert(byte_pos, c);
                self.cursor += 1;
                ComposerResult::None
            }
            _ => ComposerResult::None,
        }
    }

    /// Commands matching the current `/prefix`, for the hint list.
    pub fn matching_commands(&self) -> Vec<CommandEntry> {
        let Some(prefix) = self.content.trim_start().strip_prefix('/') else {
            return Vec::new();
        };
        let prefix = prefix.to_lowercase();
        self.command_entries
            .iter()
            .filter(|entry| entry.keyword.starts_with(&prefix))
            .copied()
            .collect()
    }

    /// Where the terminal cursor should sit inside the composer area.
    pub fn cursor_offset(&self) -> u16 {
        self.cursor.min(u16::MAX as usize) as u16
    }
}

impl Default for ChatComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &ChatComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("✉️  메시지 입력");
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.content.is_empty() {
            Line::from(Span::styled(
                INPUT_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(Span::raw(self.content.clone()))
        };
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}

/// Convert a character index to a byte index for UTF-8 safe edits
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(composer: &mut ChatComposer, code: KeyCode) -> ComposerResult {
        composer.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(composer: &mut ChatComposer, text: &str) {
        for c in text.chars() {
            press(composer, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_then_enter_submits_content() {
        let mut composer = ChatComposer::new();
        type_text(&mut composer, "자립지원제도 알려줘");

        let result = press(&mut composer, KeyCode::Enter);
        assert_eq!(
            result,
            ComposerResult::Submitted("자립지원제도 알려줘".to_string())
        );
        assert!(composer.content().is_empty());
    }

    #[test]
    fn enter_on_blank_content_is_a_no_op() {
        let mut composer = ChatComposer::new();
        type_text(&mut composer, "   ");
        assert_eq!(press(&mut composer, KeyCode::Enter), ComposerResult::None);
    }

    #[test]
    fn slash_input_becomes_a_command() {
        let mut composer = ChatComposer::new();
        type_text(&mut composer, "/web");
        assert_eq!(
            press(&mut composer, KeyCode::Enter),
            ComposerResult::Command(SlashCommand::Web)
        );
    }

    #[test]
    fn backspace_handles_multibyte_characters() {
        let mut composer = ChatComposer::new();
        type_text(&mut composer, "안녕");
        press(&mut composer, KeyCode::Backspace);
        assert_eq!(composer.content(), "안");
    }

    #[test]
    fn restore_puts_rejected_input_back() {
        let mut composer = ChatComposer::new();
        composer.restore("질문".to_string());
        assert_eq!(composer.content(), "질문");
        press(&mut composer, KeyCode::Char('!'));
        assert_eq!(composer.content(), "질문!");
    }

    #[test]
    fn matching_commands_filters_by_prefix() {
        let mut composer = ChatComposer::new();
        type_text(&mut composer, "/s");
        let matches = composer.matching_commands();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].command, SlashCommand::Save);
    }
}
