//! Notification transports.
//!
//! Each transport renders a [`NotificationPayload`] into its own wire format
//! and delivers it. Dispatch across transports lives in
//! [`crate::application::services::Dispatcher`].
//!
//! - [`FeishuTransport`] - Feishu/Lark bot webhook (interactive card)
//! - [`TelegramTransport`] - Telegram Bot API `sendMessage`
//! - [`EmailTransport`] - HTTP mail relay (smtp2go-compatible)
//! - [`WebhookTransport`] - Generic JSON status sink

mod email;
mod feishu;
pub mod format;
mod telegram;
mod webhook;

pub use email::EmailTransport;
pub use feishu::FeishuTransport;
pub use telegram::TelegramTransport;
pub use webhook::WebhookTransport;

use crate::config::NotificationConfig;
use crate::domain::entities::NotificationPayload;
use crate::error::AppError;
use crate::infrastructure::http::USER_AGENT;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The endpoint answered 2xx but reported an error in its body.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Request(e.to_string())
    }
}

impl From<TransportError> for AppError {
    fn from(e: TransportError) -> Self {
        AppError::internal("Notification delivery failed", json!({ "reason": e.to_string() }))
    }
}

/// A payload rendered for one transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportMessage {
    /// One-line summary, used as subject or log line.
    pub subject: String,
    /// Request body sent to the endpoint.
    pub body: Value,
}

/// A notification channel.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stable channel name used in dispatch results and metrics.
    fn name(&self) -> &'static str;

    fn render(&self, payload: &NotificationPayload) -> TransportMessage;

    async fn send(&self, message: &TransportMessage) -> Result<(), TransportError>;
}

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, TransportError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| TransportError::Config(e.to_string()))
}

/// Fails with [`TransportError::Status`] for a non-2xx response, otherwise
/// returns the response body (empty if it could not be read).
pub(crate) async fn read_success(response: reqwest::Response) -> Result<String, TransportError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
            body: format::truncate(&body, 200),
        })
    }
}

/// Builds every enabled transport.
pub fn from_config(
    config: &NotificationConfig,
    timeout: Duration,
) -> Result<Vec<Arc<dyn Transport>>, TransportError> {
    let mut transports: Vec<Arc<dyn Transport>> = Vec::new();

    if let Some(feishu) = &config.feishu {
        transports.push(Arc::new(FeishuTransport::new(feishu.clone(), timeout)?));
    }
    if let Some(telegram) = &config.telegram {
        transports.push(Arc::new(TelegramTransport::new(telegram.clone(), timeout)?));
    }
    if let Some(email) = &config.email {
        transports.push(Arc::new(EmailTransport::new(email.clone(), timeout)?));
    }
    if let Some(url) = &config.status_webhook {
        transports.push(Arc::new(WebhookTransport::new(url.clone(), timeout)?));
    }

    Ok(transports)
}
