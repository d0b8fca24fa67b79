use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Re-ask the last question with web-search enhancement
    Web,
    /// Save the conversation transcript
    Save,
    /// Start a fresh conversation
    Clear,
    /// Show help
    Help,
    /// Exit the application
    Quit,
}

pub fn command_entries() -> Vec<CommandEntry> {
    SlashCommand::iter()
        .map(|command| CommandEntry {
            command,
            keyword: command.command(),
            description: command.description(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub command: SlashCommand,
    pub keyword: &'static str,
    pub description: &'static str,
}

impl SlashCommand {
    /// User-visible description shown in the command hints.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Web => "최신 웹 검색으로 마지막 질문을 보완합니다",
            SlashCommand::Save => "대화를 파일로 저장합니다",
            SlashCommand::Clear => "새 대화를 시작합니다",
            SlashCommand::Help => "사용 가능한 명령을 보여줍니다",
            SlashCommand::Quit => "챗봇을 종료합니다",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let head = trimmed[1..].split_whitespace().next()?;

    SlashCommand::from_str(head)
        .ok()
        .or_else(|| match head.to_lowercase().as_str() {
            "q" | "exit" | "bye" => Some(SlashCommand::Quit),
            "w" | "websearch" | "search" => Some(SlashCommand::Web),
            "s" => Some(SlashCommand::Save),
            "new" => Some(SlashCommand::Clear),
            "h" | "?" => Some(SlashCommand::Help),
            _ => None,
        })
}

/// One-line help shown in the status area.
pub fn get_help_text() -> String {
    let summary = SlashCommand::iter()
        .map(|command| format!("/{}", command.command()))
        .collect::<Vec<_>>()
        .join(" · ");
    format!("{} — /web 으로 마지막 질문을 웹 검색으로 보완할 수 있어요", summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_commands() {
        assert_eq!(parse_slash_command("/web"), Some(SlashCommand::Web));
        assert_eq!(parse_slash_command("/save"), Some(SlashCommand::Save));
        assert_eq!(parse_slash_command("/clear"), Some(SlashCommand::Clear));
        assert_eq!(parse_slash_command("/help"), Some(SlashCommand::Help));
        assert_eq!(parse_slash_command("/quit"), Some(SlashCommand::Quit));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Quit));
        assert_eq!(parse_slash_command("/w"), Some(SlashCommand::Web));
        assert_eq!(parse_slash_command("/new"), Some(SlashCommand::Clear));
        assert_eq!(parse_slash_command("/?"), Some(SlashCommand::Help));
    }

    #[test]
    fn ignores_non_commands_and_unknowns() {
        assert_eq!(parse_slash_command("자립지원제도 알려줘"), None);
        assert_eq!(parse_slash_command("/frobnicate"), None);
        assert_eq!(parse_slash_command("/"), None);
        assert_eq!(parse_slash_command(""), None);
    }

    #[test]
    fn trailing_arguments_are_tolerated() {
        assert_eq!(parse_slash_command("/web now"), Some(SlashCommand::Web));
        assert_eq!(parse_slash_command("  /quit  "), Some(SlashCommand::Quit));
    }

    #[test]
    fn entries_cover_every_command() {
        let entries = command_entries();
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().any(|e| e.keyword == "web"));
    }
}
