//! Transport that prints publishes instead of sending them.

use async_trait::async_trait;

use super::Transport;
use crate::error::PipelineResult;

/// Writes `topic<TAB>payload` to standard output, one line per publish.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutTransport;

#[async_trait]
impl Transport for StdoutTransport {
    async fn publish(&self, topic: &str, payload: &str) -> PipelineResult<()> {
        println!("{}\t{}", topic, payload);
        Ok(())
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}
