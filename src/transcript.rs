use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::Config;
use crate::conversation::{Conversation, Message};

/// On-disk form of a saved conversation
#[derive(Debug, Serialize, Deserialize)]
pub struct Transcript {
    pub saved_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

/// Summary of a saved transcript, for listings
#[derive(Debug)]
pub struct TranscriptEntry {
    pub path: PathBuf,
    pub saved_at: DateTime<Utc>,
    pub message_count: usize,
    pub first_question: Option<String>,
}

/// Reads and writes conversation transcripts under the transcripts directory.
pub struct TranscriptStore {
    transcripts_dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(config: &Config) -> Self {
        Self {
            transcripts_dir: config.transcripts_dir(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.transcripts_dir)
            .context("Failed to create transcripts directory")?;
        Ok(())
    }

    /// Save the conversation as pretty JSON. Returns the file written.
    pub fn save(&self, conversation: &Conversation) -> Result<PathBuf> {
        self.ensure_dir()?;

        let saved_at = Utc::now();
        let transcript = Transcript {
            saved_at,
            messages: conversation.messages().to_vec(),
        };

        let id = Uuid::new_v4().to_string();
        let file_name = format!(
            "nestep-{}-{}.json",
            saved_at.format("%Y%m%d-%H%M%S"),
            &id[..8]
        );
        let path = self.transcripts_dir.join(file_name);

        let content = serde_json::to_string_pretty(&transcript)
            .context("Failed to serialize transcript")?;
        fs::write(&path, content)
            .context("Failed to write transcript")?;

        tracing::info!(path = %path.display(), "transcript saved");
        Ok(path)
    }

    /// List saved transcripts, newest first. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<TranscriptEntry>> {
        if !self.transcripts_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.transcripts_dir)
            .context("Failed to read transcripts directory")?;

        let mut transcripts = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(transcript) = serde_json::from_str::<Transcript>(&content) {
                    transcripts.push(TranscriptEntry {
                        path,
                        saved_at: transcript.saved_at,
                        message_count: transcript.messages.len(),
                        first_question: transcript
                            .messages
                            .iter()
                            .find(|m| m.sender == crate::conversation::Sender::User)
                            .map(|m| m.text.clone()),
                    });
                }
            }
        }

        transcripts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(transcripts)
    }
}
