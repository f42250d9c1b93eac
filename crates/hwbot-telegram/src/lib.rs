// # Telegram Notifier
//
// This crate relays bot messages to a single Telegram chat.
//
// ## Behavior
//
// - ✅ One `sendMessage` call per chunk of at most 4096 characters
// - ✅ `ok: false` answers are surfaced with Telegram's description
// - ❌ NO retry logic (a failed delivery is logged and dropped by the engine)
//
// ## Security Requirements
//
// - Bot token NEVER appears in logs or in Debug output (it is part of the URL,
//   so reqwest errors are stripped of their URL before being reported)
//
// ## API Reference
//
// - Bot API: https://core.telegram.org/bots/api#sendmessage

use async_trait::async_trait;
use hwbot_core::traits::Notifier;
use hwbot_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Telegram Bot API base URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Maximum message length accepted by Telegram
const MAX_MESSAGE_CHARS: usize = 4096;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Envelope of every Bot API answer
#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram notifier bound to one chat
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the bot token.
pub struct TelegramNotifier {
    /// Bot token
    /// ⚠️ NEVER log this value
    token: String,

    /// Target chat id (numeric id or `@channel`)
    chat_id: String,

    /// Bot API base URL
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the bot token
impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("token", &"<REDACTED>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TelegramNotifier {
    /// Create a notifier against the public Bot API
    ///
    /// # Parameters
    ///
    /// - `token`: Bot token from @BotFather
    /// - `chat_id`: Chat that receives every message
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self> {
        Self::with_api_base(token, chat_id, TELEGRAM_API_BASE, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a notifier against a custom Bot API server
    pub fn with_api_base(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let token = token.into();
        let chat_id = chat_id.into();
        if token.is_empty() {
            return Err(Error::config("Telegram token cannot be empty"));
        }
        if chat_id.is_empty() {
            return Err(Error::config("Telegram chat id cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token,
            chat_id,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn send_chunk(&self, chunk: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": chunk,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::delivery(format!("sendMessage request failed: {}", e.without_url())))?;

        let status = response.status();
        let body: TgResponse = response.json().await.map_err(|e| {
            Error::delivery(format!(
                "sendMessage answered {} with unreadable body: {}",
                status,
                e.without_url()
            ))
        })?;

        if !body.ok || !status.is_success() {
            return Err(Error::delivery(
                body.description
                    .unwrap_or_else(|| format!("sendMessage failed with status {}", status)),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        for chunk in split_message(text) {
            if let Err(e) = self.send_chunk(&chunk).await {
                tracing::error!("Failed to deliver message to chat {}: {}", self.chat_id, e);
                return Err(e);
            }
        }
        tracing::debug!("Message delivered to chat {}", self.chat_id);
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "telegram"
    }
}

/// Split text into chunks Telegram accepts
fn split_message(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_MESSAGE_CHARS)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
