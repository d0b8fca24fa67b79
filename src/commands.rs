use anyhow::Result;

use crate::api::ChatClient;
use crate::config::Config;
use crate::conversation::Sender;
use crate::session::ChatSession;
use crate::transcript::TranscriptStore;

/// Ask one question and print the exchange. With `--web`, a second
/// web-enhanced pass for the same question follows.
pub async fn ask(config: &Config, question: &str, web: bool) -> Result<()> {
    let client = ChatClient::new(config);
    let mut session = ChatSession::new(client);

    session.submit_question(question).await;
    if web {
        session.enhance_with_web_search().await;
    }

    let mut offered = false;
    for message in session.conversation().messages() {
        // The greeting belongs to the chat screen, not one-shot output.
        if message.id == "welcome" {
            continue;
        }
        if message.offers_web_search {
            offered = true;
            continue;
        }
        let icon = match message.sender {
            Sender::User => "👤",
            Sender::Assistant => "🌿",
        };
        println!("{} {}", icon, message.text);
        println!();
    }

    if offered && !web {
        println!("💡 '--web' 옵션을 주면 최신 웹 검색으로 보완한 답변도 받을 수 있어요.");
    }

    Ok(())
}

/// List saved transcripts, newest first.
pub fn list_transcripts(config: &Config) -> Result<()> {
    let store = TranscriptStore::new(config);
    let transcripts = store.list()?;

    if transcripts.is_empty() {
        println!("📭 저장된 대화가 없어요. 채팅 중 /save 로 저장할 수 있어요.");
        return Ok(());
    }

    println!("📜 저장된 대화:");
    println!();
    for entry in transcripts {
        let first_question = entry.first_question.as_deref().unwrap_or("(질문 없음)");
        println!(
            "  • {}  ({}개 메시지)  {}",
            entry.saved_at.format("%Y-%m-%d %H:%M:%S"),
            entry.message_count,
            first_question
        );
        println!("    {}", entry.path.display());
    }

    Ok(())
}
