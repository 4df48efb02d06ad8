//! Telegram Bot API channel.

use async_trait::async_trait;

use super::{ensure_success, AlertError, AlertEvent, Notifier, REQUEST_TIMEOUT};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends alerts through the Telegram Bot API.
pub struct TelegramNotifier {
    api_base: String,
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, bot_token, chat_id)
    }

    /// Use a non-default API server (self-hosted bot API, tests).
    pub fn with_api_base(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": event.render(),
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        ensure_success(response).await?;
        tracing::info!("Alert sent via Telegram");
        Ok(())
    }
}
