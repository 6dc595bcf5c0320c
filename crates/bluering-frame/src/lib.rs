//! Checksummed frame codecs for the two ring protocol generations.
//!
//! - V1: fixed 16-byte frames, `opcode | payload (14, zero padded) | checksum`
//! - V2: `0xBC | opcode | payload | checksum` commands, responses carrying a
//!   6-byte header with a little-endian payload length and spanning any
//!   number of notifications
//!
//! Both sit behind [`FrameCodec`], picked per command with [`codec_for`].

pub mod checksum;
pub mod codec;
pub mod error;
pub mod v1;
pub mod v2;

pub use bluering_transport::Generation;
pub use checksum::checksum;
pub use codec::{codec_for, Assembled, Feed, FrameCodec};
pub use error::{FrameError, Result};
pub use v1::{V1Codec, V1Frame};
pub use v2::{V2Codec, V2Header};
