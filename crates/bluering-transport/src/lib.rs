//! Transport boundary for the ring protocol.
//!
//! The protocol layer only needs two things from a wireless link:
//! - write one opaque buffer to the "command" characteristic
//! - receive opaque buffers from the "notification" characteristic, in order
//!
//! This is the lowest layer of bluering. Discovery and connection setup live
//! outside the crate; they hand over something implementing [`DeviceLink`]
//! once the [`ServiceProfile`] of the right [`Generation`] has been verified.

pub mod error;
pub mod memory;
pub mod profile;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::MemoryLink;
pub use profile::{Generation, ServiceProfile, ADVERTISED_SERVICE};
pub use traits::{DeviceLink, NotificationSink};
