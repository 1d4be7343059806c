//! # Transport Module
//!
//! The publish/subscribe link is an injected collaborator: the session only
//! ever calls [`Transport::publish`] and never owns connection lifecycle.
//!
//! Implementations:
//! - [`memory::MemoryTransport`]: records publishes, for tests and previews
//! - [`stdout::StdoutTransport`]: prints `topic<TAB>payload` lines (dry runs)
//! - [`http::HttpBridgeTransport`]: posts to a broker's HTTP publish API

use async_trait::async_trait;

use crate::error::PipelineResult;

pub mod http;
pub mod memory;
pub mod stdout;

pub use http::HttpBridgeTransport;
pub use memory::{MemoryTransport, Published};
pub use stdout::StdoutTransport;

/// Abstract publish interface.
///
/// A publish is fire-and-forget from the pipeline's point of view: there is
/// no acknowledgement and the session never retries. Implementations report
/// failures so callers can surface them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Publish `payload` on `topic`.
    async fn publish(&self, topic: &str, payload: &str) -> PipelineResult<()>;

    /// Short human-readable name used in logs.
    fn describe(&self) -> String;
}
