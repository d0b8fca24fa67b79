//! Chat log display component

use crate::conversation::{Conversation, ERROR_PREFIX, Message, Sender};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Renders the conversation bottom-anchored, with a typing animation on the
/// pending placeholder and a hint under the web-search offer bubble.
pub struct ChatLog<'a> {
    conversation: &'a Conversation,
    tick: u64,
}

impl<'a> ChatLog<'a> {
    pub fn new(conversation: &'a Conversation, tick: u64) -> Self {
        Self { conversation, tick }
    }

    /// Render a single message into lines
    fn message_lines(&self, message: &Message, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let role_icon = match message.sender {
            Sender::User => "👤",
            Sender::Assistant => "🌿",
        };
        let timestamp = message.timestamp.format("%H:%M:%S").to_string();
        let header = format!("{} {} {}", role_icon, timestamp, "─".repeat(20));
        lines.push(Line::from(Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )));

        let is_typing = self
            .conversation
            .pending()
            .is_some_and(|p| p.placeholder_id == message.id);

        let mut text = message.text.clone();
        if is_typing {
            // Animated ellipsis while the reply is pending
            text.push_str(match self.tick % 4 {
                0 => "",
                1 => ".",
                2 => "..",
                _ => "...",
            });
        }

        let style = self.content_style(message);
        let content_lines = wrap_text(&text, width.saturating_sub(2) as usize);
        let last = content_lines.len().saturating_sub(1);
        for (i, content_line) in content_lines.into_iter().enumerate() {
            let mut spans = vec![Span::raw("  "), Span::styled(content_line, style)];
            if is_typing && i == last {
                spans.push(Span::styled("▋", Style::default().fg(Color::Yellow)));
            }
            lines.push(Line::from(spans));
        }

        if message.offers_web_search {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    "→ /web 를 입력하면 최신 웹 검색으로 보완합니다",
                    Style::default().fg(Color::Cyan),
                ),
            ]));
        }

        lines
    }

    fn content_style(&self, message: &Message) -> Style {
        match message.sender {
            Sender::User => Style::default().fg(Color::Green),
            Sender::Assistant if message.text.starts_with(ERROR_PREFIX) => {
                Style::default().fg(Color::Red)
            }
            Sender::Assistant => Style::default().fg(Color::Yellow),
        }
    }
}

impl Widget for ChatLog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 NeStep 챗봇");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut all_lines: Vec<Line> = Vec::new();
        for message in self.conversation.messages() {
            all_lines.extend(self.message_lines(message, inner.width));
            // spacing between messages
            all_lines.push(Line::from(Span::raw("")));
        }

        // Show the tail of the conversation, newest at the bottom
        let height = inner.height as usize;
        let start = all_lines.len().saturating_sub(height);
        for (i, line) in all_lines[start..].iter().enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}

/// Wrap text to fit within the given width, counting characters
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let mut current_line = String::new();
        let mut current_len = 0;

        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            if current_len + word_len + usize::from(current_len > 0) <= width {
                if current_len > 0 {
                    current_line.push(' ');
                    current_len += 1;
                }
                current_line.push_str(word);
                current_len += word_len;
            } else {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current_line));
                }
                current_line.push_str(word);
                current_len = word_len;
            }
        }
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("안녕하세요", 20), vec!["안녕하세요"]);
    }

    #[test]
    fn long_text_wraps_at_word_boundaries() {
        let lines = wrap_text("자립 준비 청년을 위한 지원 제도 안내", 10);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn newlines_are_preserved() {
        let lines = wrap_text("첫 줄\n둘째 줄", 20);
        assert_eq!(lines, vec!["첫 줄", "둘째 줄"]);
    }

    #[test]
    fn zero_width_does_not_panic() {
        assert_eq!(wrap_text("내용", 0), vec!["내용"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
