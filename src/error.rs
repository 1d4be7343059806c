//! # Pipeline Error Handling
//!
//! Error types for the message encoding pipeline, the send session and the
//! receiving side.
//!
//! ## Architecture
//!
//! - **Error Types**: One enum with structured fields per failure category
//! - **Error Context**: Timestamp, operation, recovery suggestion and metadata
//! - **Error Traits**: Severity and recovery-suggestion accessors
//!
//! Every pipeline error is terminal for the send action it occurs in. Errors
//! raised while encoding always happen before anything is handed to a
//! transport, so a failed picture send never leaves a lone first chunk behind.
//!
//! ## Usage
//!
//! ```rust
//! use messagebox::error::{PipelineError, HasRecoverySuggestion};
//!
//! let error = PipelineError::invalid_image("image has zero width")
//!     .with_operation("resize")
//!     .with_recovery_suggestion("pick a different photo");
//!
//! assert_eq!(error.category(), "invalid_image");
//! assert_eq!(error.recovery_suggestion(), Some("pick a different photo"));
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt, time::SystemTime};

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Errors that abort the current send action
    Error,
    /// Errors that need the user to change configuration or input
    Critical,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }
}

/// Base error type for the messagebox library
#[derive(Debug)]
pub enum PipelineError {
    /// Image missing, zero-dimension, wrong grid size or unreadable
    InvalidImage {
        reason: String,
        context: ErrorContext,
    },
    /// Malformed run-length text or chunk framing
    Encoding {
        token: String,
        reason: String,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// Publish failures reported by a transport
    Transport {
        operation: String,
        address: Option<String>,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// Receiver saw a payload it cannot place in the current state
    State {
        current_state: String,
        attempted_operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// External library errors
    External {
        library: String,
        source: Box<dyn StdError + Send + Sync>,
        context: ErrorContext,
    },
}

impl PipelineError {
    /// Create an invalid image error
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a run-length / chunk encoding error
    pub fn encoding(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encoding {
            token: token.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext {
                severity: ErrorSeverity::Critical,
                ..ErrorContext::new()
            },
        }
    }

    /// Create a transport error
    pub fn transport(operation: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            address: None,
            source: None,
            context: ErrorContext::new(),
        }
    }

    /// Create a state error
    pub fn state(
        current_state: impl Into<String>,
        attempted_operation: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::State {
            current_state: current_state.into(),
            attempted_operation: attempted_operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an external library error
    pub fn external(
        library: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            library: library.into(),
            source: Box::new(source),
            context: ErrorContext::new(),
        }
    }

    /// Attach the endpoint a transport error refers to
    pub fn with_address(mut self, addr: impl Into<String>) -> Self {
        if let Self::Transport { address, .. } = &mut self {
            *address = Some(addr.into());
        }
        self
    }

    /// Attach the underlying cause of a transport error
    pub fn with_source(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        if let Self::Transport { source, .. } = &mut self {
            *source = Some(Box::new(cause));
        }
        self
    }

    /// Attach the file path an I/O error refers to
    pub fn with_path(mut self, p: impl Into<String>) -> Self {
        if let Self::Io { path, .. } = &mut self {
            *path = Some(p.into());
        }
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidImage { context, .. } => context,
            Self::Encoding { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::State { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::InvalidImage { context, .. } => context,
            Self::Encoding { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::State { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidImage { .. } => "invalid_image",
            Self::Encoding { .. } => "encoding",
            Self::Config { .. } => "config",
            Self::Transport { .. } => "transport",
            Self::State { .. } => "state",
            Self::Io { .. } => "io",
            Self::External { .. } => "external",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidImage { reason, .. } => {
                write!(f, "Invalid image: {}", reason)
            }
            PipelineError::Encoding { token, reason, .. } => {
                write!(f, "Malformed encoding near '{}': {}", token, reason)
            }
            PipelineError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            PipelineError::Transport {
                operation,
                address,
                source,
                ..
            } => {
                match address {
                    Some(address) => write!(f, "Transport error during {} on {}", operation, address)?,
                    None => write!(f, "Transport error during {}", operation)?,
                }
                if let Some(source) = source {
                    write!(f, ": {}", source)?;
                }
                Ok(())
            }
            PipelineError::State {
                current_state,
                attempted_operation,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Invalid state '{}' when attempting '{}': {}",
                    current_state, attempted_operation, reason
                )
            }
            PipelineError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "I/O error during {} on '{}': {}",
                        operation, path, source
                    )
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            PipelineError::External {
                library, source, ..
            } => {
                write!(f, "External library error in {}: {}", library, source)
            }
        }
    }
}

impl StdError for PipelineError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::External { source, .. } => Some(source.as_ref()),
            Self::Transport {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Trait for errors with severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for PipelineError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for PipelineError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Input problems: the same input will fail the same way again.
    pub fn is_input_error(error: &PipelineError) -> bool {
        matches!(
            error,
            PipelineError::InvalidImage { .. }
                | PipelineError::Encoding { .. }
                | PipelineError::Config { .. }
        )
    }

    /// Failures raised after the payload left the encoder.
    pub fn is_delivery_error(error: &PipelineError) -> bool {
        matches!(error, PipelineError::Transport { .. })
    }

    /// Check if an error requires user intervention
    pub fn requires_user_intervention(error: &PipelineError) -> bool {
        error.severity() >= ErrorSeverity::Critical
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        Self::external("serde_json", error)
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(error: image::ImageError) -> Self {
        Self::invalid_image(error.to_string())
    }
}

impl From<mbox_scale::cpu::ScaleError> for PipelineError {
    fn from(error: mbox_scale::cpu::ScaleError) -> Self {
        match error {
            mbox_scale::cpu::ScaleError::EmptyInput => {
                Self::invalid_image("image has a zero dimension")
            }
            other => Self::external("fast_image_resize", other),
        }
    }
}
