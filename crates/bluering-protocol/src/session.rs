//! Response accumulation for one in-flight command.
//!
//! ```text
//!                  first frame              completion rule met
//! AwaitingFirstFrame ─────────► Accumulating ────────────────────► Complete
//!        │                           │
//!        └──────────┬────────────────┘
//!                   ▼  disconnect / cancel / timeout / strict frame error
//!                 Failed
//! ```
//!
//! A session never touches the transport: the caller writes the command
//! frame and routes notification buffers into [`CommandSession::feed`].

use std::time::Duration;

use bluering_frame::{Assembled, FrameCodec, FrameError};
use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::catalog::CommandSpec;
use crate::command::Command;
use crate::completion::{Completion, Disposition, Tracker};
use crate::config::ProtocolConfig;
use crate::error::{ProtocolError, Result};
use crate::params::Params;
use crate::payload::Response;
use crate::record::Decoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingFirstFrame,
    Accumulating,
    Complete,
    Failed,
}

/// Why a session failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Disconnected,
    Cancelled,
    Timeout(Duration),
    /// A frame problem escalated by strict validation.
    Frame(FrameError),
}

impl From<Failure> for ProtocolError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Disconnected => ProtocolError::Disconnected,
            Failure::Cancelled => ProtocolError::Cancelled,
            Failure::Timeout(after) => ProtocolError::Timeout(after),
            Failure::Frame(err) => ProtocolError::Frame(err),
        }
    }
}

/// Effect of one event on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More frames are needed.
    Pending,
    /// This event completed the response.
    Complete,
    /// The session was already terminal; nothing changed.
    Ignored,
    /// This event failed the session.
    Failed,
}

struct ResponseAccumulator {
    codec: Box<dyn FrameCodec>,
    tracker: Tracker,
    set_aside: Vec<Bytes>,
    no_data: bool,
    assembled: Option<Assembled>,
}

impl ResponseAccumulator {
    fn assembled(&mut self) -> &Assembled {
        let codec = &mut self.codec;
        self.assembled.get_or_insert_with(|| codec.take())
    }

    fn clear(&mut self) {
        self.codec.take();
        self.set_aside.clear();
        self.assembled = None;
    }
}

/// One command's response lifecycle.
pub struct CommandSession {
    spec: &'static CommandSpec,
    params: Params,
    config: ProtocolConfig,
    state: SessionState,
    failure: Option<Failure>,
    acc: ResponseAccumulator,
    observations: Vec<FrameError>,
}

impl CommandSession {
    pub fn new(command: &Command, config: ProtocolConfig) -> Self {
        let spec = command.spec();
        Self {
            spec,
            params: command.params().clone(),
            config,
            state: SessionState::AwaitingFirstFrame,
            failure: None,
            acc: ResponseAccumulator {
                codec: bluering_frame::codec_for(spec.generation, spec.opcode),
                tracker: Tracker::new(spec.completion, spec.opcode),
                set_aside: Vec::new(),
                no_data: false,
                assembled: None,
            },
            observations: Vec::new(),
        }
    }

    pub fn command_name(&self) -> &'static str {
        self.spec.name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Complete | SessionState::Failed)
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Every non-fatal problem noticed so far, in arrival order.
    pub fn observations(&self) -> &[FrameError] {
        &self.observations
    }

    /// Feed one notification buffer.
    pub fn feed(&mut self, buf: &[u8]) -> Progress {
        let command = self.spec.name;
        if self.is_terminal() {
            trace!(command, len = buf.len(), "ignoring frame after terminal state");
            return Progress::Ignored;
        }
        if self.config.trace_frames {
            debug!(command, frame = %hex::encode(buf), "received frame");
        }

        let verdict = self.acc.tracker.observe(buf);
        match verdict.disposition {
            Disposition::Store => {
                let feed = self.acc.codec.feed(buf);
                for issue in &feed.issues {
                    warn!(command, frame = %hex::encode(buf), %issue, "frame problem");
                }
                if self.config.is_strict() {
                    if let Some(err) = feed.issues.first() {
                        return self.fail(Failure::Frame(err.clone()));
                    }
                }
                self.observations.extend(feed.issues);
                if !feed.accepted {
                    return Progress::Pending;
                }
            }
            Disposition::SetAside => {
                debug!(command, frame = %hex::encode(buf), "frame set aside");
                self.acc.set_aside.push(Bytes::copy_from_slice(buf));
            }
            Disposition::Drop => {
                debug!(command, frame = %hex::encode(buf), "device reports no data");
            }
        }
        for observation in &verdict.observations {
            warn!(command, frame = %hex::encode(buf), %observation, "frame problem");
        }
        self.observations.extend(verdict.observations);

        let done = verdict.done
            || (self.spec.completion.defers_to_codec() && self.acc.codec.is_complete());
        if done {
            self.acc.no_data = verdict.no_data;
            self.state = SessionState::Complete;
            debug!(
                command,
                frames = self.acc.codec.frames_received(),
                no_data = verdict.no_data,
                "response complete"
            );
            Progress::Complete
        } else {
            if self.state == SessionState::AwaitingFirstFrame {
                self.state = SessionState::Accumulating;
            }
            if self.spec.completion == Completion::Measurement {
                debug!(command, "measuring in progress");
            }
            Progress::Pending
        }
    }

    /// Fail the session, discarding whatever was accumulated.
    pub fn fail(&mut self, failure: Failure) -> Progress {
        if self.is_terminal() {
            return Progress::Ignored;
        }
        warn!(command = self.spec.name, ?failure, "command failed");
        self.acc.clear();
        self.failure = Some(failure);
        self.state = SessionState::Failed;
        Progress::Failed
    }

    pub fn cancel(&mut self) -> Progress {
        self.fail(Failure::Cancelled)
    }

    pub fn disconnected(&mut self) -> Progress {
        self.fail(Failure::Disconnected)
    }

    /// Decode the complete response.
    ///
    /// A failed session returns its failure; a decode problem keeps every
    /// received byte in [`ProtocolError::Decode`].
    pub fn decode(&mut self) -> Result<Decoded> {
        match self.state {
            SessionState::Complete => {}
            SessionState::Failed => {
                return Err(self
                    .failure
                    .clone()
                    .unwrap_or(Failure::Cancelled)
                    .into())
            }
            SessionState::AwaitingFirstFrame | SessionState::Accumulating => {
                return Err(ProtocolError::Incomplete {
                    command: self.spec.name,
                })
            }
        }
        if self.acc.no_data {
            return Ok(Decoded::NoData);
        }

        let command = self.spec.name;
        let acc = &mut self.acc;
        let codec = &mut acc.codec;
        let assembled = &*acc.assembled.get_or_insert_with(|| codec.take());
        let response = Response {
            command,
            params: &self.params,
            assembled,
            set_aside: &acc.set_aside,
            config: &self.config,
        };
        (self.spec.decode)(&response).map_err(|source| {
            warn!(command, %source, raw = %hex::encode(assembled.raw()), "decode failed");
            ProtocolError::Decode {
                command,
                source,
                raw: assembled.raw(),
            }
        })
    }

    /// Assembled response bytes, once complete.
    pub fn raw(&mut self) -> Option<Bytes> {
        if !self.is_complete() {
            return None;
        }
        Some(self.acc.assembled().raw())
    }

    /// Frames kept out of the response body (clock notices).
    pub fn set_aside(&self) -> &[Bytes] {
        &self.acc.set_aside
    }
}

impl std::fmt::Debug for CommandSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSession")
            .field("command", &self.spec.name)
            .field("state", &self.state)
            .field("failure", &self.failure)
            .field("frames", &self.acc.codec.frames_received())
            .finish_non_exhaustive()
    }
}
