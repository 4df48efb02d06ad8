//! WhatsApp channel speaking the Evolution API gateway protocol.

use async_trait::async_trait;

use super::{ensure_success, AlertError, AlertEvent, Notifier, REQUEST_TIMEOUT};

/// Sends alerts through an Evolution API instance.
///
/// The gateway holds the actual WhatsApp session; before sending we ask it
/// whether the instance connection is open and refuse the send otherwise.
pub struct WhatsAppNotifier {
    api_url: String,
    token: String,
    instance: String,
    number: String,
    client: reqwest::Client,
}

impl WhatsAppNotifier {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        instance: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            instance: instance.into(),
            number: number.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Ask the gateway whether the WhatsApp session is usable.
    async fn connection_open(&self) -> Result<bool, AlertError> {
        let url = format!(
            "{}/instance/connectionState/{}",
            self.api_url, self.instance
        );

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("apikey", &self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let body: serde_json::Value = response.json().await?;
        let state = body
            .pointer("/instance/state")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        Ok(state == "open")
    }
}

#[async_trait]
impl Notifier for WhatsAppNotifier {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError> {
        if !self.connection_open().await? {
            return Err(AlertError::GatewayUnavailable(format!(
                "Evolution API instance {} is not connected",
                self.instance
            )));
        }

        let url = format!("{}/message/sendText/{}", self.api_url, self.instance);

        let payload = serde_json::json!({
            "number": self.number,
            "text": event.render(),
        });

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("apikey", &self.token)
            .json(&payload)
            .send()
            .await?;

        ensure_success(response).await?;
        tracing::info!("Alert sent via WhatsApp (Evolution API)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::Transition;
    use chrono::Utc;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn down_event() -> AlertEvent {
        AlertEvent {
            status: Transition::Down,
            host: "gateway.local".to_string(),
            container_id: "mon".to_string(),
            timestamp: Utc::now(),
            consecutive_failures: 5,
            total_samples: 50,
            failed_samples: 5,
            success_rate: 90.0,
        }
    }

    fn connection_state(state: &str) -> serde_json::Value {
        serde_json::json!({ "instance": { "state": state } })
    }

    #[tokio::test]
    async fn test_send_checks_state_then_posts_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/instance/connectionState/sentry"))
            .and(header("apikey", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(connection_state("open")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/message/sendText/sentry"))
            .and(header("apikey", "secret"))
            .and(body_partial_json(serde_json::json!({
                "number": "5511999999999",
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WhatsAppNotifier::new(server.uri(), "secret", "sentry", "5511999999999");
        notifier.send(&down_event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_refused_when_instance_closed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/instance/connectionState/sentry"))
            .respond_with(ResponseTemplate::new(200).set_body_json(connection_state("close")))
            .mount(&server)
            .await;

        let notifier = WhatsAppNotifier::new(server.uri(), "secret", "sentry", "5511999999999");
        let err = notifier.send(&down_event()).await.unwrap_err();

        assert!(matches!(err, AlertError::GatewayUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_state_endpoint_reads_as_closed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let notifier = WhatsAppNotifier::new(server.uri(), "secret", "sentry", "5511999999999");
        assert!(notifier.send(&down_event()).await.is_err());
    }
}
