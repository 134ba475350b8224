//! Telegram Bot API transport.

use super::format::{body_lines, escape_html};
use super::{Transport, TransportError, TransportMessage, build_client, read_success};
use crate::config::TelegramConfig;
use crate::domain::entities::{NotificationEntry, NotificationPayload};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// Sends HTML-formatted messages through `sendMessage`.
pub struct TelegramTransport {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramTransport {
    pub fn new(config: TelegramConfig, timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(timeout)?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

fn html_entry(entry: &NotificationEntry) -> String {
    let url = escape_html(&entry.url);
    match &entry.title {
        Some(title) => format!("• <a href=\"{}\">{}</a>", url, escape_html(title)),
        None => format!("• {}", url),
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn render(&self, payload: &NotificationPayload) -> TransportMessage {
        let subject = payload.title();
        let mut text = format!("<b>{}</b>", escape_html(&subject));
        let lines = body_lines(payload, html_entry, escape_html);
        if !lines.is_empty() {
            text.push_str("\n\n");
            text.push_str(&lines.join("\n"));
        }

        TransportMessage {
            subject,
            body: json!({
                "chat_id": self.config.chat_id,
                "text": text,
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            }),
        }
    }

    async fn send(&self, message: &TransportMessage) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&message.body)
            .send()
            .await?;
        let text = read_success(response).await?;

        let reply: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        if reply.get("ok").and_then(Value::as_bool) == Some(false) {
            let description = reply
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(TransportError::Rejected(description.to_string()));
        }

        Ok(())
    }
}
