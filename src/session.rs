//! # Send Session
//!
//! Orchestrates one send action at a time: either a text message or a
//! picture, encoded fully and then handed to the injected transport.
//!
//! ## Send Modes
//!
//! - **Text**: `message + "$&#"`, one publish
//! - **Picture**: resize → binarize → run-length encode → split, then two
//!   publishes (first chunk, second chunk), or one when single-message
//!   framing is configured
//!
//! Encoding runs on a blocking worker so async callers keep running while the
//! 16384-pixel scan happens. Publishing starts only after the encode has
//! succeeded, so an invalid image never produces a stray first chunk.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::config::{PictureFraming, SendConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::processing::{Bitmap, PicturePipeline, frame};
use crate::transport::Transport;

/// What the user asked to send.
#[derive(Debug, Clone)]
pub enum SendAction {
    Text(String),
    Picture(DynamicImage),
}

impl SendAction {
    pub fn mode(&self) -> SendMode {
        match self {
            SendAction::Text(_) => SendMode::Text,
            SendAction::Picture(_) => SendMode::Picture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    Text,
    Picture,
}

impl fmt::Display for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendMode::Text => write!(f, "text"),
            SendMode::Picture => write!(f, "picture"),
        }
    }
}

/// Summary of a completed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    pub mode: SendMode,
    pub topic: String,
    /// Payloads exactly as published, in order
    pub payloads: Vec<String>,
    /// Thresholded grid behind a picture send
    pub bitmap: Option<Bitmap>,
}

impl SendReport {
    pub fn publishes(&self) -> usize {
        self.payloads.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.payloads.iter().map(String::len).sum()
    }
}

/// Wire payloads for one action, plus the bitmap a picture was reduced to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub payloads: Vec<String>,
    pub bitmap: Option<Bitmap>,
}

/// Turn an action into the wire payloads it produces, without publishing.
///
/// This is the synchronous core of [`SendSession::send`].
pub fn prepare(action: &SendAction, config: &SendConfig) -> PipelineResult<Prepared> {
    match action {
        SendAction::Text(message) => {
            if frame::contains_reserved(message) {
                warn!("message contains '$' or '$&#'; receivers may misread it");
            }
            Ok(Prepared {
                payloads: vec![frame::frame(message)],
                bitmap: None,
            })
        }
        SendAction::Picture(image) => {
            let encoded = PicturePipeline::new(config.aspect())?.encode(image)?;
            let payloads = match config.framing {
                PictureFraming::Split => {
                    let (first, second) = encoded.chunks();
                    vec![first, second]
                }
                PictureFraming::Single => vec![encoded.single()],
            };
            Ok(Prepared {
                payloads,
                bitmap: Some(encoded.bitmap),
            })
        }
    }
}

/// Session that sends actions through one transport.
pub struct SendSession {
    transport: Arc<dyn Transport>,
    config: SendConfig,
}

impl SendSession {
    /// Create a new send session using the builder pattern.
    pub fn builder() -> SendSessionBuilder {
        SendSessionBuilder::new()
    }

    pub fn config(&self) -> &SendConfig {
        &self.config
    }

    /// Encode `action` and publish the result.
    ///
    /// # Errors
    ///
    /// Encoding errors ([`PipelineError::InvalidImage`] and friends) abort the
    /// action before any publish. A [`PipelineError::Transport`] error may
    /// follow a successful first publish; it is reported, not retried.
    pub async fn send(&self, action: SendAction) -> PipelineResult<SendReport> {
        let mode = action.mode();
        let Prepared { payloads, bitmap } = match action {
            SendAction::Text(_) => prepare(&action, &self.config)?,
            SendAction::Picture(_) => {
                let config = self.config.clone();
                tokio::task::spawn_blocking(move || prepare(&action, &config))
                    .await
                    .map_err(|e| PipelineError::external("tokio", e).with_operation("encode picture"))??
            }
        };

        let topic = self.config.topic.as_str();
        for (index, payload) in payloads.iter().enumerate() {
            debug!(%mode, index, bytes = payload.len(), "publishing");
            self.transport.publish(topic, payload).await.map_err(|e| {
                e.with_operation(format!("publish {} payload {}", mode, index + 1))
                    .with_metadata("published_before_failure", index.to_string())
            })?;
        }

        info!(
            %mode,
            publishes = payloads.len(),
            transport = %self.transport.describe(),
            "send complete"
        );
        Ok(SendReport {
            mode,
            topic: self.config.topic.clone(),
            payloads,
            bitmap,
        })
    }

    /// Send a text message.
    pub async fn send_text(&self, message: impl Into<String>) -> PipelineResult<SendReport> {
        self.send(SendAction::Text(message.into())).await
    }

    /// Send a picture.
    pub async fn send_picture(&self, image: DynamicImage) -> PipelineResult<SendReport> {
        self.send(SendAction::Picture(image)).await
    }
}

/// Builder for creating send sessions with fluent API.
#[derive(Default)]
pub struct SendSessionBuilder {
    transport: Option<Arc<dyn Transport>>,
    config: SendConfig,
}

impl SendSessionBuilder {
    /// Create a new session builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport every publish goes through.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Share an existing transport handle.
    pub fn with_shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_config(mut self, config: SendConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.config.topic = topic.into();
        self
    }

    /// Build the send session with the configured components.
    pub fn build(self) -> PipelineResult<SendSession> {
        self.config
            .validate()
            .map_err(|reason| PipelineError::config("send", self.config.topic.clone(), reason))?;

        let transport = self.transport.ok_or_else(|| {
            PipelineError::config("transport", "none", "no transport specified")
        })?;

        Ok(SendSession {
            transport,
            config: self.config,
        })
    }
}
