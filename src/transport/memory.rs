//! In-memory transport that records every publish.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::Transport;
use crate::error::{PipelineError, PipelineResult};

/// One recorded publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
}

/// Records publishes in order. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    log: Arc<Mutex<Vec<Published>>>,
    fail_at: Option<usize>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the publish with zero-based index `index` (and record nothing for it).
    pub fn failing_at(index: usize) -> Self {
        Self {
            log: Arc::default(),
            fail_at: Some(index),
        }
    }

    /// Snapshot of everything published so far.
    pub fn published(&self) -> Vec<Published> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Payloads only, in publish order.
    pub fn payloads(&self) -> Vec<String> {
        self.published().into_iter().map(|p| p.payload).collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn publish(&self, topic: &str, payload: &str) -> PipelineResult<()> {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        if self.fail_at == Some(log.len()) {
            return Err(PipelineError::transport("publish").with_address("memory"));
        }
        log.push(Published {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_order_and_shares_log() {
        let transport = MemoryTransport::new();
        let view = transport.clone();

        transport.publish("", "a").await.unwrap();
        transport.publish("t", "b").await.unwrap();

        assert_eq!(view.payloads(), vec!["a", "b"]);
        assert_eq!(view.published()[1].topic, "t");

        view.clear();
        assert!(transport.published().is_empty());
    }

    #[tokio::test]
    async fn fails_at_requested_index() {
        let transport = MemoryTransport::failing_at(1);
        transport.publish("", "first").await.unwrap();
        assert!(transport.publish("", "second").await.is_err());
        assert_eq!(transport.payloads(), vec!["first"]);
    }
}
