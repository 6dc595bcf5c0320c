//! Async request/response over a [`DeviceLink`].
//!
//! The transport delivers notifications on its own thread through
//! [`ResponseSink`]; the caller awaits [`PendingCommand::wait`]. Both sides
//! share the session behind one mutex, and completion is signalled once
//! through a oneshot channel while that mutex is held, so no frame can slip
//! in between the "done" decision and the wake-up.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bluering_transport::{DeviceLink, NotificationSink, ServiceProfile, TransportError};
use bytes::Bytes;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::command::Command;
use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::record::Decoded;
use crate::session::{CommandSession, Failure, Progress};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared {
    session: Mutex<CommandSession>,
    done: Mutex<Option<oneshot::Sender<()>>>,
}

impl Shared {
    fn apply(&self, event: impl FnOnce(&mut CommandSession) -> Progress) -> Progress {
        let mut session = lock(&self.session);
        let progress = event(&mut session);
        if session.is_terminal() {
            if let Some(done) = lock(&self.done).take() {
                let _ = done.send(());
            }
        }
        progress
    }
}

/// Notification sink feeding a pending command.
#[derive(Clone)]
pub struct ResponseSink {
    shared: Arc<Shared>,
}

impl NotificationSink for ResponseSink {
    fn deliver(&self, buf: &[u8]) {
        self.shared.apply(|session| session.feed(buf));
    }

    fn disconnected(&self) {
        self.shared.apply(CommandSession::disconnected);
    }
}

/// Cancels a pending command from anywhere.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<Shared>,
}

impl CancelHandle {
    /// Fail the command with `Cancelled` and wake the waiter. Returns
    /// [`Progress::Ignored`] if the command had already finished.
    pub fn cancel(&self) -> Progress {
        self.shared.apply(CommandSession::cancel)
    }
}

/// A command whose response is being awaited.
pub struct PendingCommand {
    name: &'static str,
    frame: Bytes,
    config: ProtocolConfig,
    shared: Arc<Shared>,
    done: oneshot::Receiver<()>,
}

impl PendingCommand {
    pub fn new(command: &Command, config: ProtocolConfig) -> Self {
        let (tx, rx) = oneshot::channel();
        let session = command.session(config.clone());
        Self {
            name: command.name(),
            frame: command.frame().clone(),
            config,
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                done: Mutex::new(Some(tx)),
            }),
            done: rx,
        }
    }

    /// Frame to write to the command characteristic.
    pub fn outbound(&self) -> &Bytes {
        &self.frame
    }

    pub fn sink(&self) -> ResponseSink {
        ResponseSink {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Wait for the response, bounded by the configured timeout.
    pub async fn wait(self) -> Result<Decoded> {
        let timeout = self.config.response_timeout;
        if tokio::time::timeout(timeout, self.done).await.is_err() {
            let progress = self
                .shared
                .apply(|session| session.fail(Failure::Timeout(timeout)));
            if progress == Progress::Ignored {
                debug!(command = self.name, "response completed at the deadline");
            }
        }
        let mut session = lock(&self.shared.session);
        session.decode()
    }
}

/// Run one command over `link`: subscribe, write, await, unsubscribe.
///
/// There are no retries; a failed write or a timeout is returned as is.
pub async fn execute<L>(link: &mut L, command: &Command, config: ProtocolConfig) -> Result<Decoded>
where
    L: DeviceLink + ?Sized,
{
    let wanted = ServiceProfile::for_generation(command.generation());
    if link.profile() != wanted {
        return Err(TransportError::Unavailable {
            what: format!(
                "{} command '{}' needs service {}",
                command.generation(),
                command.name(),
                wanted.service
            ),
        }
        .into());
    }

    let pending = PendingCommand::new(command, config);
    link.subscribe(Arc::new(pending.sink()))?;
    debug!(
        command = command.name(),
        frame = %hex::encode(pending.outbound()),
        "writing command"
    );
    if let Err(err) = link.write_command(pending.outbound()) {
        if let Err(unsub) = link.unsubscribe() {
            warn!(error = %unsub, "unsubscribe after failed write");
        }
        return Err(err.into());
    }

    let result = pending.wait().await;
    if let Err(err) = link.unsubscribe() {
        debug!(error = %err, "unsubscribe failed");
    }
    result
}
