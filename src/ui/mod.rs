//! Terminal lifecycle and the interactive chat loop

pub mod conversation;

use crate::api::ChatClient;
use crate::config::Config;
use crate::events::{EventHandler, TuiEvent};
use crate::transcript::TranscriptStore;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

use conversation::{ConversationAction, ConversationManager};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

/// Run the interactive chat screen until the user quits.
pub async fn run(config: Config) -> Result<()> {
    install_panic_hook();
    let mut terminal = init()?;

    let mut events = EventHandler::new();
    let mut manager = ConversationManager::new(ChatClient::new(&config));
    let store = TranscriptStore::new(&config);

    let result = run_loop(&mut terminal, &mut events, &mut manager, &store).await;
    restore()?;
    result
}

async fn run_loop(
    terminal: &mut Tui,
    events: &mut EventHandler,
    manager: &mut ConversationManager,
    store: &TranscriptStore,
) -> Result<()> {
    loop {
        manager.process_outcomes();
        terminal.draw(|frame| manager.render(frame))?;

        let Some(event) = events.next().await else {
            return Ok(());
        };

        match event {
            TuiEvent::Key(key) => match manager.handle_key(key) {
                ConversationAction::Exit => return Ok(()),
                ConversationAction::SaveTranscript => match store.save(manager.conversation()) {
                    Ok(path) => {
                        manager.set_notice(format!("대화를 저장했어요: {}", path.display()));
                    }
                    Err(error) => {
                        tracing::error!(error = %error, "failed to save transcript");
                        manager.set_notice(format!("저장에 실패했어요: {:#}", error));
                    }
                },
                ConversationAction::None => {}
            },
            TuiEvent::Tick => manager.on_tick(),
            TuiEvent::Resize(_, _) => {}
        }
    }
}
