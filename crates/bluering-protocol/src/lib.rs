//! Command catalog, response sessions and payload codecs.
//!
//! This is the layer callers talk to: resolve a command by name, hand its
//! outbound frame to the transport, feed notifications into a
//! [`CommandSession`] and read back a typed [`Decoded`] result.
//!
//! ```
//! use bluering_protocol::{Command, Decoded, Params, ProtocolConfig};
//!
//! let config = ProtocolConfig::default();
//! let command = Command::new("battery", Params::new(), &config).unwrap();
//! let mut session = command.session(config);
//!
//! let mut frame = [0u8; 16];
//! frame[0] = 0x03;
//! frame[1] = 87;
//! frame[15] = 0x03 + 87;
//! session.feed(&frame);
//!
//! match session.decode().unwrap() {
//!     Decoded::Battery(status) => assert_eq!(status.percent, 87),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod catalog;
pub mod command;
pub mod completion;
pub mod config;
pub mod error;
#[cfg(feature = "async")]
pub mod exchange;
pub mod params;
pub mod payload;
pub mod record;
pub mod session;

pub use catalog::{lookup, CommandSpec, CATALOG};
pub use command::Command;
pub use completion::Completion;
pub use config::{ProtocolConfig, TimeZoneMode, Validation, DEFAULT_RESPONSE_TIMEOUT};
pub use error::{ProtocolError, Result};
#[cfg(feature = "async")]
pub use exchange::{execute, CancelHandle, PendingCommand, ResponseSink};
pub use params::Params;
pub use payload::DecodeError;
pub use record::{
    BatteryStatus, ClockSet, Decoded, HrMeasurement, HrSample, PreferenceState, SleepPhase,
    SleepSegment, SleepStage, Spo2Sample, StepRecord, StressSample,
};
pub use session::{CommandSession, Failure, Progress, SessionState};
