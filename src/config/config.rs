//! # Configuration Structures
//!
//! Configuration for send actions and for the broker a transport talks to.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Description |
//! |-----------|------|---------|-------------|
//! | `send.topic` | `String` | `""` | Topic every payload is published to |
//! | `send.fit` | `FitPreset` | `stretch` | How photos are mapped onto the grid |
//! | `send.framing` | `PictureFraming` | `split` | Two publishes or one per picture |
//! | `broker.url` | `String` | local EMQX publish API | HTTP publish endpoint |
//! | `broker.client_id` | `String` | `messagebox` | Publisher identity |
//! | `broker.qos` | `u8` | 0 | MQTT QoS level (0-2) |
//! | `broker.timeout_ms` | `u64` | 5000 | Per-request timeout |
//!
//! ## Examples
//!
//! ```rust
//! use messagebox::config::AppConfig;
//!
//! let config: AppConfig = serde_json::from_str(
//!     r#"{ "send": { "topic": "display/1" }, "broker": { "qos": 1 } }"#,
//! ).unwrap();
//!
//! assert_eq!(config.send.topic, "display/1");
//! assert_eq!(config.broker.client_id, "messagebox");
//! assert!(config.validate().is_ok());
//! ```

use std::path::Path;
use std::time::Duration;

use mbox_scale::presets::{AspectMode, FitPreset};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// How a picture payload is handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PictureFraming {
    /// Two publishes: `first half + "$"`, then the second half.
    #[default]
    Split,
    /// One publish carrying both halves with the `$` marker in between.
    Single,
}

/// Settings for a single send action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendConfig {
    /// Topic passed to every publish. Empty by default, as receivers
    /// subscribe to the broker's default topic.
    pub topic: String,

    /// Photo-to-grid mapping. `stretch` ignores the aspect ratio and is what
    /// receivers expect; the letterbox presets are opt-in.
    pub fit: FitPreset,

    /// Two-chunk or single-message picture framing.
    pub framing: PictureFraming,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            fit: FitPreset::Stretch,
            framing: PictureFraming::Split,
        }
    }
}

impl SendConfig {
    pub fn new(topic: impl Into<String>, fit: FitPreset, framing: PictureFraming) -> Self {
        Self {
            topic: topic.into(),
            fit,
            framing,
        }
    }

    /// Aspect handling for the resizer.
    pub fn aspect(&self) -> AspectMode {
        self.fit.to_aspect()
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.topic.contains(['#', '+']) {
            return Err("Topic must not contain MQTT wildcards ('#', '+')".to_string());
        }
        Ok(())
    }
}

/// Connection settings for the HTTP publish bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Full URL of the broker's HTTP publish endpoint.
    pub url: String,

    /// Client id reported with every publish.
    pub client_id: String,

    /// Basic-auth user, if the endpoint requires one.
    pub username: Option<String>,

    /// Basic-auth password.
    pub password: Option<String>,

    /// MQTT QoS level requested for published messages.
    pub qos: u8,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:18083/api/v5/publish".to_string(),
            client_id: "messagebox".to_string(),
            username: None,
            password: None,
            qos: 0,
            timeout_ms: 5000,
        }
    }
}

impl BrokerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(format!("Broker URL must be http(s), got '{}'", self.url));
        }
        if self.client_id.is_empty() {
            return Err("Client id must not be empty".to_string());
        }
        if self.qos > 2 {
            return Err("QoS must be 0, 1 or 2".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0 ms".to_string());
        }
        if self.password.is_some() && self.username.is_none() {
            return Err("Password given without username".to_string());
        }
        Ok(())
    }
}

/// Top-level file layout: `{ "send": {...}, "broker": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub send: SendConfig,
    pub broker: BrokerConfig,
}

impl AppConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::io("read config", e).with_path(path.display().to_string())
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            PipelineError::from(e).with_context(format!("parsing {}", path.display()))
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.send.validate()?;
        self.broker.validate()
    }
}
