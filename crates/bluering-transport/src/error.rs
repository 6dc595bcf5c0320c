/// Errors that can occur at the transport boundary.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A required GATT service or characteristic was not found.
    #[error("required channel not available: {what}")]
    Unavailable { what: String },

    /// Writing a command frame failed.
    #[error("failed to write command: {0}")]
    Write(String),

    /// No notification sink is registered on the link.
    #[error("no notification sink subscribed")]
    NotSubscribed,

    /// The link to the device has been closed.
    #[error("link disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, TransportError>;
