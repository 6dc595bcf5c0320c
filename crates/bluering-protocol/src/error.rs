use std::time::Duration;

use bytes::Bytes;

use crate::payload::DecodeError;

/// Errors surfaced to protocol-layer callers.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Transport-level error, including a missing GATT channel.
    #[error("transport error: {0}")]
    Transport(#[from] bluering_transport::TransportError),

    /// Frame-level error (encoding, or validation in strict mode).
    #[error("frame error: {0}")]
    Frame(#[from] bluering_frame::FrameError),

    /// No command with this name in the catalog.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// A command parameter is unknown or outside its domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The accumulated response could not be decoded.
    ///
    /// `raw` holds every byte received, for diagnostics.
    #[error("failed to decode {command} response: {source}")]
    Decode {
        command: &'static str,
        #[source]
        source: DecodeError,
        raw: Bytes,
    },

    /// A result was requested before the response completed.
    #[error("{command} response is not complete")]
    Incomplete { command: &'static str },

    /// The response did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The command was cancelled by the caller.
    #[error("command cancelled")]
    Cancelled,

    /// The device disconnected while the command was in flight.
    #[error("device disconnected")]
    Disconnected,
}

impl ProtocolError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
