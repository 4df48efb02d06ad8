//! Alert types, notifier trait, and the dispatch fan-out.

mod telegram;
mod webhook;
mod whatsapp;

pub use telegram::TelegramNotifier;
pub use webhook::WebhookNotifier;
pub use whatsapp::WhatsAppNotifier;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::AlertConfig;
use crate::monitor::Transition;

/// Timeout applied to every outgoing alert request.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Alert transport error types.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("gateway unavailable: {0}")]
    GatewayUnavailable(String),
}

/// Map a non-2xx response to an error, draining the body for context.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<(), AlertError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(AlertError::Status { status, body })
}

/// Snapshot of a confirmed transition, handed to every notifier by value.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub status: Transition,
    pub host: String,
    pub container_id: String,
    pub timestamp: DateTime<Utc>,
    pub consecutive_failures: u32,
    pub total_samples: u64,
    pub failed_samples: u64,
    pub success_rate: f64,
}

impl AlertEvent {
    /// Render the human-readable alert text shared by all channels.
    pub fn render(&self) -> String {
        let timestamp = self.timestamp.format("%Y-%m-%d %H:%M:%S");
        match self.status {
            Transition::Down => format!(
                "\u{1f534} <b>ALERT - HOST DOWN</b>\n\
                 \u{1f5a5} Host: {}\n\
                 \u{1f4e6} Container: {}\n\
                 \u{23f0} Timestamp: {}\n\
                 \u{274c} Consecutive failures: {}\n\
                 \u{1f4ca} Success rate: {:.1}%\n\
                 \u{1f504} Total pings: {}",
                self.host,
                self.container_id,
                timestamp,
                self.consecutive_failures,
                self.success_rate,
                self.total_samples
            ),
            Transition::Up => format!(
                "\u{2705} <b>RECOVERY - HOST UP</b>\n\
                 \u{1f5a5} Host: {}\n\
                 \u{1f4e6} Container: {}\n\
                 \u{23f0} Timestamp: {}\n\
                 \u{1f4ca} Success rate: {:.1}%\n\
                 \u{1f504} Total pings: {}",
                self.host, self.container_id, timestamp, self.success_rate, self.total_samples
            ),
        }
    }
}

/// A notification transport. Each implementation owns its endpoint and
/// credentials, interprets its own HTTP responses, and logs its own errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name, used in logs.
    fn name(&self) -> &str;

    /// Deliver one alert.
    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError>;
}

/// Fans a confirmed transition out to every configured channel.
///
/// Each send runs as its own detached task: a slow or failing channel never
/// blocks the monitor loop or the other channels, and nobody awaits the
/// delivery result. Errors are logged inside the task.
pub struct AlertDispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl AlertDispatcher {
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// Build a dispatcher with every channel whose credentials are present.
    pub fn from_config(config: &AlertConfig) -> Self {
        let mut dispatcher = Self::new();

        if let (Some(token), Some(chat_id)) =
            (&config.telegram_bot_token, &config.telegram_chat_id)
        {
            if !token.is_empty() && !chat_id.is_empty() {
                tracing::info!("Adding Telegram alert channel");
                dispatcher.add_notifier(Arc::new(TelegramNotifier::new(token, chat_id)));
            }
        }

        if let Some(url) = &config.webhook_url {
            if !url.is_empty() {
                tracing::info!("Adding webhook alert channel");
                dispatcher.add_notifier(Arc::new(WebhookNotifier::new(url, &config.environment)));
            }
        }

        if let (Some(token), Some(number)) = (&config.whatsapp_token, &config.whatsapp_number) {
            if !token.is_empty() && !number.is_empty() {
                tracing::info!("Adding WhatsApp alert channel");
                dispatcher.add_notifier(Arc::new(WhatsAppNotifier::new(
                    &config.whatsapp_api_url,
                    token,
                    &config.whatsapp_instance,
                    number,
                )));
            }
        }

        dispatcher
    }

    pub fn add_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Names of the configured channels.
    pub fn channel_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Launch one fire-and-forget send per channel and return immediately.
    pub fn dispatch(&self, event: &AlertEvent) {
        for notifier in &self.notifiers {
            let notifier = Arc::clone(notifier);
            let event = event.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.send(&event).await {
                    tracing::error!("Failed to send alert via {}: {}", notifier.name(), e);
                }
            });
        }
    }
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
