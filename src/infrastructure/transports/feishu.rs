//! Feishu (Lark) custom bot webhook.

use super::format::{body_lines, escape_html};
use super::{Transport, TransportError, TransportMessage, build_client, read_success};
use crate::config::FeishuConfig;
use crate::domain::entities::{AlertLevel, NotificationEntry, NotificationPayload};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// Posts interactive cards to a Feishu bot webhook.
///
/// When a secret is configured every request carries `timestamp` and `sign`
/// fields as required by signed webhooks.
pub struct FeishuTransport {
    client: reqwest::Client,
    config: FeishuConfig,
}

impl FeishuTransport {
    pub fn new(config: FeishuConfig, timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(timeout)?,
            config,
        })
    }

    fn template(payload: &NotificationPayload) -> &'static str {
        match payload {
            NotificationPayload::StatusAlert {
                level: AlertLevel::Error,
                ..
            } => "red",
            NotificationPayload::StatusAlert {
                level: AlertLevel::Warning,
                ..
            } => "orange",
            NotificationPayload::Digest { .. } => "green",
            _ => "blue",
        }
    }
}

fn card_entry(entry: &NotificationEntry) -> String {
    match &entry.title {
        Some(title) => format!("- [{}]({})", escape_html(title), entry.url),
        None => format!("- {}", entry.url),
    }
}

/// Signature of a signed webhook request.
///
/// The key is `"{timestamp}\n{secret}"` and the signed message is empty.
pub(crate) fn sign(secret: &str, timestamp: i64) -> Result<String, TransportError> {
    let string_to_sign = format!("{}\n{}", timestamp, secret);
    let mac = HmacSha256::new_from_slice(string_to_sign.as_bytes())
        .map_err(|e| TransportError::Config(e.to_string()))?;
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl Transport for FeishuTransport {
    fn name(&self) -> &'static str {
        "feishu"
    }

    fn render(&self, payload: &NotificationPayload) -> TransportMessage {
        let subject = payload.title();
        let content = body_lines(payload, card_entry, escape_html).join("\n");

        let body = json!({
            "msg_type": "interactive",
            "card": {
                "config": { "wide_screen_mode": true },
                "header": {
                    "title": { "tag": "plain_text", "content": subject },
                    "template": Self::template(payload),
                },
                "elements": [
                    { "tag": "div", "text": { "tag": "lark_md", "content": content } }
                ],
            },
        });

        TransportMessage { subject, body }
    }

    async fn send(&self, message: &TransportMessage) -> Result<(), TransportError> {
        let mut body = message.body.clone();

        if let Some(secret) = &self.config.secret
            && let Value::Object(fields) = &mut body
        {
            let timestamp = chrono::Utc::now().timestamp();
            fields.insert("timestamp".to_string(), json!(timestamp.to_string()));
            fields.insert("sign".to_string(), json!(sign(secret, timestamp)?));
        }

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&body)
            .send()
            .await?;
        let text = read_success(response).await?;

        // The webhook answers 200 with a non-zero code on logical errors.
        let reply: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        let code = reply
            .get("code")
            .or_else(|| reply.get("StatusCode"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if code != 0 {
            let msg = reply
                .get("msg")
                .or_else(|| reply.get("StatusMessage"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(TransportError::Rejected(format!("code {}: {}", code, msg)));
        }

        Ok(())
    }
}
