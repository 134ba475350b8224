//! Email through an HTTP mail relay.

use super::format::{body_lines, escape_html, plain_text};
use super::{Transport, TransportError, TransportMessage, build_client, read_success};
use crate::config::EmailConfig;
use crate::domain::entities::{NotificationEntry, NotificationPayload};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// Sends mail via a JSON relay API (smtp2go `email/send` shape).
pub struct EmailTransport {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailTransport {
    pub fn new(config: EmailConfig, timeout: Duration) -> Result<Self, TransportError> {
        if config.recipients.is_empty() {
            return Err(TransportError::Config("no email recipients".to_string()));
        }
        Ok(Self {
            client: build_client(timeout)?,
            config,
        })
    }
}

fn html_entry(entry: &NotificationEntry) -> String {
    let url = escape_html(&entry.url);
    let label = entry.title.as_deref().map(escape_html).unwrap_or_else(|| url.clone());
    format!("<li><a href=\"{}\">{}</a></li>", url, label)
}

#[async_trait]
impl Transport for EmailTransport {
    fn name(&self) -> &'static str {
        "email"
    }

    fn render(&self, payload: &NotificationPayload) -> TransportMessage {
        let subject = format!("[SiteBot] {}", payload.title());
        let html = format!(
            "<h3>{}</h3>\n{}",
            escape_html(&payload.title()),
            body_lines(payload, html_entry, escape_html).join("\n")
        );

        TransportMessage {
            subject: subject.clone(),
            body: json!({
                "api_key": self.config.api_key,
                "sender": self.config.sender,
                "to": self.config.recipients,
                "subject": subject,
                "text_body": plain_text(payload),
                "html_body": html,
            }),
        }
    }

    async fn send(&self, message: &TransportMessage) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .json(&message.body)
            .send()
            .await?;
        let text = read_success(response).await?;

        let reply: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        let failed = reply
            .pointer("/data/failed")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        if failed > 0 {
            return Err(TransportError::Rejected(format!(
                "{} recipient(s) failed",
                failed
            )));
        }

        Ok(())
    }
}
