use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

/// TUI-specific events (keyboard, resize, animation tick)
#[derive(Debug)]
pub enum TuiEvent {
    /// Key press event
    Key(KeyEvent),

    /// Terminal resize
    Resize(u16, u16),

    /// Animation/housekeeping tick
    Tick,
}

/// Result of a chat exchange carried back from the request task to the UI
/// loop. Names the placeholder it resolves so completion never has to guess.
#[derive(Debug)]
pub struct ExchangeOutcome {
    pub placeholder_id: String,
    pub outcome: Result<String>,
}

/// Merges the crossterm event stream with a periodic tick into one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // Terminal input reader
        let tx_events = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                let Some(Ok(event)) = reader.next().await else {
                    break;
                };
                let tui_event = match event {
                    // Only key presses, not releases
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        Some(TuiEvent::Key(key))
                    }
                    Event::Resize(w, h) => Some(TuiEvent::Resize(w, h)),
                    _ => None,
                };
                if let Some(event) = tui_event {
                    if tx_events.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        // Tick timer driving the typing animation and outcome polling
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_millis(250));
            loop {
                interval.tick().await;
                if tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
