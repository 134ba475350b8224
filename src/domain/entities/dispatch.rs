//! Aggregate outcome of one dispatch.

use serde::Serialize;
use std::collections::BTreeMap;

/// Delivery outcome for one transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelOutcome {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Per-channel results of a dispatch. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub channels: BTreeMap<String, ChannelOutcome>,
}

impl DispatchResult {
    pub fn record(&mut self, channel: impl Into<String>, outcome: ChannelOutcome) {
        self.total += 1;
        if outcome.success {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        self.channels.insert(channel.into(), outcome);
    }

    pub fn outcome(&self, channel: &str) -> Option<&ChannelOutcome> {
        self.channels.get(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut result = DispatchResult::default();
        result.record("feishu", ChannelOutcome::delivered());
        result.record("telegram", ChannelOutcome::failed("timeout"));

        assert_eq!(result.total, 2);
        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(
            result.outcome("telegram").and_then(|o| o.error.as_deref()),
            Some("timeout")
        );
    }
}
