use std::sync::Arc;

use crate::error::Result;
use crate::profile::ServiceProfile;

/// Receiver of inbound notification buffers.
///
/// The transport calls [`deliver`](NotificationSink::deliver) once per
/// notification, in arrival order, without coalescing or splitting buffers.
/// Implementations must tolerate being called from a transport callback
/// thread.
pub trait NotificationSink: Send + Sync {
    /// One notification buffer arrived.
    fn deliver(&self, buf: &[u8]);

    /// The link went away; no further buffers will arrive.
    fn disconnected(&self);
}

/// A connected device link with its command and notification channels.
///
/// The protocol is half-duplex: callers subscribe a sink, write exactly one
/// command frame, and wait for the sink to see the whole response.
pub trait DeviceLink {
    /// GATT profile this link was opened with.
    fn profile(&self) -> ServiceProfile;

    /// Register the sink for the notification channel, replacing any
    /// previous one.
    fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) -> Result<()>;

    /// Write one command frame to the command channel (no response expected
    /// synchronously).
    fn write_command(&mut self, frame: &[u8]) -> Result<()>;

    /// Drop the registered sink.
    fn unsubscribe(&mut self) -> Result<()>;
}
