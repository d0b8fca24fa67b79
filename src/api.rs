use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Request body for the chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(rename = "useWeb")]
    pub use_web: bool,
}

/// Response body from the chat endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// The single exchange the backend supports: a question plus the
/// web-enhancement flag, answered with a reply string.
#[async_trait]
pub trait ChatBackend {
    async fn send_message(&self, message: &str, use_web: bool) -> Result<String>;
}

/// HTTP client for the NeStep chat backend
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    api_base: String,
}

impl ChatClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.clone(),
        }
    }

    /// Send one question to `POST {base}/api/chat` and return the reply text.
    /// Non-2xx responses carry their status and body in the error so the UI
    /// can surface the detail inline.
    async fn send(&self, message: &str, use_web: bool) -> Result<String> {
        let url = format!("{}/api/chat", self.api_base);
        let payload = ChatRequest { message, use_web };

        tracing::info!(%url, use_web, "sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("요청을 보내지 못했습니다")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, "chat request rejected");
            return Err(anyhow!("HTTP {} - {}", status, body.trim()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("응답을 해석하지 못했습니다")?;

        tracing::info!(reply_len = parsed.reply.len(), "chat reply received");
        Ok(parsed.reply)
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn send_message(&self, message: &str, use_web: bool) -> Result<String> {
        self.send(message, use_web).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_flag() {
        let request = ChatRequest {
            message: "자립지원제도 알려줘",
            use_web: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "message": "자립지원제도 알려줘", "useWeb": true })
        );
    }

    #[test]
    fn response_parses_reply_field() {
        let response: ChatResponse =
            serde_json::from_str(r#"{ "reply": "안내해 드릴게요." }"#).unwrap();
        assert_eq!(response.reply, "안내해 드릴게요.");
    }

    #[test]
    fn response_rejects_missing_reply() {
        let result = serde_json::from_str::<ChatResponse>(r#"{ "answer": "x" }"#);
        assert!(result.is_err());
    }
}
