//! Fan-out of notification events to every enabled transport.

use std::sync::Arc;

use crate::domain::entities::{ChannelOutcome, DispatchResult, NotificationPayload};
use crate::infrastructure::transports::Transport;
use futures::future::join_all;
use tracing::{info, warn};

/// Delivers one event to all transports concurrently.
///
/// Every transport runs in its own task, so an error or panic in one channel
/// never affects the others. The aggregate is returned once all have finished.
#[derive(Clone)]
pub struct Dispatcher {
    transports: Vec<Arc<dyn Transport>>,
}

impl Dispatcher {
    pub fn new(transports: Vec<Arc<dyn Transport>>) -> Self {
        Self { transports }
    }

    pub fn channels(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    /// Sends `payload` through every transport and reports each outcome.
    ///
    /// With no transports the result is empty. Never fails.
    pub async fn dispatch(&self, payload: &NotificationPayload) -> DispatchResult {
        let handles = self.transports.iter().map(|transport| {
            let transport = Arc::clone(transport);
            let payload = payload.clone();
            let name = transport.name();
            let task = tokio::spawn(async move {
                let message = transport.render(&payload);
                transport.send(&message).await
            });
            async move { (name, task.await) }
        });

        let mut result = DispatchResult::default();

        for (name, joined) in join_all(handles).await {
            let outcome = match joined {
                Ok(Ok(())) => ChannelOutcome::delivered(),
                Ok(Err(e)) => {
                    warn!(channel = name, error = %e, "Notification delivery failed");
                    ChannelOutcome::failed(e.to_string())
                }
                Err(e) => {
                    warn!(channel = name, error = %e, "Notification task aborted");
                    ChannelOutcome::failed(format!("transport task failed: {}", e))
                }
            };

            let label = if outcome.success { "success" } else { "failure" };
            metrics::counter!("sitebot_dispatch_total", "channel" => name, "outcome" => label)
                .increment(1);
            result.record(name, outcome);
        }

        info!(
            event = payload.kind(),
            total = result.total,
            success = result.success,
            failed = result.failed,
            "Dispatch finished"
        );
        result
    }
}
