//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::TelegramConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;

/// Envelope returned by every Bot API method
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to a single Telegram chat
pub struct TelegramNotifier {
    send_message_url: String,
    bot_token: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(
        config: &TelegramConfig,
        bot_token: &str,
        chat_id: &str,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let send_message_url = format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            bot_token
        );

        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            send_message_url,
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            http,
        }
    }

    fn redact(&self, text: &str) -> String {
        text.replace(&self.bot_token, "<redacted>")
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, text: &str) -> crate::Result<()> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", text)];

        // The URL embeds the bot token, so transport errors are redacted.
        let response = self
            .http
            .post_form(&self.send_message_url, &params)
            .await
            .map_err(|e| crate::BotError::Notifier(self.redact(&e.to_string())))?;

        let envelope = serde_json::from_str::<BotApiResponse>(&response.body).ok();

        if response.status != 200 || !envelope.as_ref().is_some_and(|e| e.ok) {
            let description = envelope
                .and_then(|e| e.description)
                .unwrap_or_else(|| response.body.clone());
            return Err(crate::BotError::Notifier(format!(
                "Telegram API returned status {}: {}",
                response.status, description
            )));
        }

        tracing::debug!("Telegram message delivered to chat {}", self.chat_id);
        Ok(())
    }
}
