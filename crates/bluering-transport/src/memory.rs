//! In-memory [`DeviceLink`] for tests and capture replay.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::profile::ServiceProfile;
use crate::traits::{DeviceLink, NotificationSink};

type Responder = Box<dyn FnMut(&[u8]) -> Vec<Bytes> + Send>;

/// A device link backed by memory.
///
/// Every written command frame is recorded. When a responder is installed it
/// is called with each written frame and whatever buffers it returns are
/// delivered to the subscribed sink before `write_command` returns.
pub struct MemoryLink {
    profile: ServiceProfile,
    sink: Option<Arc<dyn NotificationSink>>,
    written: Vec<Bytes>,
    responder: Option<Responder>,
    available: bool,
    connected: bool,
}

impl MemoryLink {
    /// Create a link for the given profile with no responder.
    pub fn new(profile: ServiceProfile) -> Self {
        Self {
            profile,
            sink: None,
            written: Vec::new(),
            responder: None,
            available: true,
            connected: true,
        }
    }

    /// Create a link whose notification channel cannot be subscribed, as if
    /// service discovery had not found it.
    pub fn unavailable(profile: ServiceProfile) -> Self {
        Self {
            available: false,
            ..Self::new(profile)
        }
    }

    /// Install a responder producing notification buffers per written frame.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: FnMut(&[u8]) -> Vec<Bytes> + Send + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Push an unsolicited notification to the subscribed sink.
    pub fn notify(&self, buf: &[u8]) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(TransportError::NotSubscribed)?;
        sink.deliver(buf);
        Ok(())
    }

    /// Simulate the device dropping the connection.
    pub fn disconnect(&mut self) {
        self.connected = false;
        if let Some(sink) = self.sink.take() {
            debug!("memory link disconnected");
            sink.disconnected();
        }
    }

    /// Command frames written so far.
    pub fn written(&self) -> &[Bytes] {
        &self.written
    }

    /// Whether a sink is currently subscribed.
    pub fn is_subscribed(&self) -> bool {
        self.sink.is_some()
    }
}

impl DeviceLink for MemoryLink {
    fn profile(&self) -> ServiceProfile {
        self.profile
    }

    fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) -> Result<()> {
        if !self.available {
            return Err(TransportError::Unavailable {
                what: format!("characteristic {}", self.profile.notify),
            });
        }
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        self.sink = Some(sink);
        Ok(())
    }

    fn write_command(&mut self, frame: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        trace!(len = frame.len(), "memory link write");
        self.written.push(Bytes::copy_from_slice(frame));

        let responses = match self.responder.as_mut() {
            Some(responder) => responder(frame),
            None => Vec::new(),
        };
        for buf in responses {
            self.notify(&buf)?;
        }
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<()> {
        self.sink = None;
        Ok(())
    }
}

impl fmt::Debug for MemoryLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLink")
            .field("profile", &self.profile)
            .field("subscribed", &self.sink.is_some())
            .field("written", &self.written.len())
            .field("available", &self.available)
            .field("connected", &self.connected)
            .finish()
    }
}
