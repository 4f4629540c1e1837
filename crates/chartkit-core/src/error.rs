//! Error handling for ChartKit
//!
//! Provides error types for every layer of the annotation engine:
//! - Axis errors (render-pass metadata and coordinate transforms)
//! - Sync errors (remote delete/update calls)
//! - Drawings errors (push-channel messages)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Axis error type
///
/// Represents problems with the axis metadata reported by the rendering
/// engine for the current render pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AxisError {
    /// No render pass has completed yet, so no axis metadata exists
    #[error("Axis metadata not ready")]
    NotReady,

    /// A shape or sample references an axis absent from the render pass
    #[error("Axis {axis} is not part of the current render pass")]
    MissingAxis {
        /// The axis identifier that could not be found.
        axis: String,
    },

    /// A transform produced a NaN or infinite coordinate
    #[error("Non-finite coordinate on axis {axis}: {value}")]
    NonFinite {
        /// The axis whose transform failed.
        axis: String,
        /// The offending value.
        value: f64,
    },

    /// Axis metadata was captured during an earlier render pass
    #[error("Axis metadata from render pass {captured} is stale (current {current})")]
    StaleRenderPass {
        /// Render pass the metadata was captured in.
        captured: u64,
        /// Current render pass of the engine.
        current: u64,
    },

    /// A date-typed axis value could not be converted to a timestamp
    #[error("Invalid date value: {input}")]
    InvalidDate {
        /// The raw input that failed to parse.
        input: String,
    },
}

/// Sync error type
///
/// Represents failures of the remote drawing persistence backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("HTTP error: {reason}")]
    Http {
        /// The reason reported by the HTTP client.
        reason: String,
    },

    /// The backend answered with a non-success HTTP status
    #[error("Backend returned HTTP {code}")]
    Status {
        /// The HTTP status code.
        code: u16,
    },

    /// The backend answered `{"status": "error"}`
    #[error("Backend rejected {id} for {symbol}: {message}")]
    Rejected {
        /// The chart symbol of the request.
        symbol: String,
        /// The drawing id of the request.
        id: String,
        /// The message supplied by the backend, if any.
        message: String,
    },

    /// The backend response body could not be decoded
    #[error("Failed to decode backend response: {reason}")]
    Decode {
        /// The decoding failure.
        reason: String,
    },

    /// The shape is no longer present in the registry
    #[error("Shape {id} not found")]
    UnknownShape {
        /// The missing drawing id.
        id: String,
    },
}

/// Drawings error type
///
/// Represents malformed `drawings` messages from the push channel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawingsError {
    /// The message is not valid JSON or misses required fields
    #[error("Invalid drawings JSON: {reason}")]
    Json {
        /// The parse failure.
        reason: String,
    },

    /// A push-channel message of another kind reached the drawings parser
    #[error("Unexpected message type '{message_type}'")]
    UnexpectedMessage {
        /// The `type` tag of the message.
        message_type: String,
    },

    /// A drawing carries a `type` this engine does not render
    #[error("Unknown drawing type: {kind}")]
    UnknownType {
        /// The unknown type tag.
        kind: String,
    },

    /// A drawing names a subplot the chart does not have
    #[error("Unknown subplot: {name}")]
    UnknownSubplot {
        /// The subplot name.
        name: String,
    },

    /// A timestamp or price could not be converted
    #[error(transparent)]
    Axis(#[from] AxisError),
}

/// Main error type for ChartKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Axis error
    #[error(transparent)]
    Axis(#[from] AxisError),

    /// Sync error
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Drawings error
    #[error(transparent)]
    Drawings(#[from] DrawingsError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a sync error
    pub fn is_sync_error(&self) -> bool {
        matches!(self, Error::Sync(_))
    }

    /// Check if this is an axis error
    pub fn is_axis_error(&self) -> bool {
        matches!(self, Error::Axis(_) | Error::Drawings(DrawingsError::Axis(_)))
    }

    /// Check if the render pass simply has not happened yet
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Error::Axis(AxisError::NotReady))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
