//! Generic JSON webhook channel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ensure_success, AlertError, AlertEvent, Notifier, REQUEST_TIMEOUT};

/// Body posted to the configured webhook endpoint.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    timestamp: DateTime<Utc>,
    host: &'a str,
    status: String,
    message: String,
    consecutive_failures: u32,
    total_samples: u64,
    failed_samples: u64,
    success_rate: f64,
    container_id: &'a str,
    environment: &'a str,
}

/// Posts the full alert snapshot as JSON to an arbitrary endpoint.
pub struct WebhookNotifier {
    url: String,
    environment: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            environment: environment.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError> {
        let payload = WebhookPayload {
            timestamp: event.timestamp,
            host: &event.host,
            status: event.status.to_string(),
            message: event.render(),
            consecutive_failures: event.consecutive_failures,
            total_samples: event.total_samples,
            failed_samples: event.failed_samples,
            success_rate: event.success_rate,
            container_id: &event.container_id,
            environment: &self.environment,
        };

        let response = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        ensure_success(response).await?;
        tracing::info!("Alert sent via webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::Transition;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn up_event() -> AlertEvent {
        AlertEvent {
            status: Transition::Up,
            host: "example.org".to_string(),
            container_id: "node-1".to_string(),
            timestamp: Utc::now(),
            consecutive_failures: 0,
            total_samples: 200,
            failed_samples: 10,
            success_rate: 95.0,
        }
    }

    #[tokio::test]
    async fn test_send_posts_snapshot_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({
                "host": "example.org",
                "status": "UP",
                "total_samples": 200,
                "failed_samples": 10,
                "success_rate": 95.0,
                "container_id": "node-1",
                "environment": "production",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(format!("{}/hook", server.uri()), "production");
        notifier.send(&up_event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_surfaces_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri(), "production");
        assert!(notifier.send(&up_event()).await.is_err());
    }
}
