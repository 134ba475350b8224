//! Generic JSON status sink.

use super::{Transport, TransportError, TransportMessage, build_client, read_success};
use crate::domain::entities::NotificationPayload;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Posts the raw event as JSON: `{event, title, payload, timestamp}`.
pub struct WebhookTransport {
    client: reqwest::Client,
    url: String,
}

impl WebhookTransport {
    pub fn new(url: String, timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(timeout)?,
            url,
        })
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn render(&self, payload: &NotificationPayload) -> TransportMessage {
        let subject = payload.title();
        TransportMessage {
            body: json!({
                "event": payload.kind(),
                "title": subject,
                "payload": payload,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
            subject,
        }
    }

    async fn send(&self, message: &TransportMessage) -> Result<(), TransportError> {
        let response = self.client.post(&self.url).json(&message.body).send().await?;
        read_success(response).await?;
        Ok(())
    }
}
