//! Generation 1 framing: every frame, in both directions, is 16 bytes.
//!
//! ```text
//! ┌──────────┬──────────────────────────────┬──────────┐
//! │ Opcode   │ Payload                      │ Checksum │
//! │ (1B)     │ (14B, zero padded)           │ (1B)     │
//! └──────────┴──────────────────────────────┴──────────┘
//! ```
//!
//! Responses may set the top opcode bit as an acknowledgment flag.

use std::mem;

use bluering_transport::Generation;
use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::checksum;
use crate::codec::{Assembled, Feed, FrameCodec};
use crate::error::{FrameError, Result};

/// Total frame size.
pub const FRAME_LEN: usize = 16;

/// Payload bytes between opcode and checksum.
pub const PAYLOAD_LEN: usize = 14;

/// Acknowledgment flag carried in the opcode byte of responses.
pub const ACK_FLAG: u8 = 0x80;

/// A fully validated V1 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V1Frame {
    /// Opcode with the acknowledgment bit masked off.
    pub opcode: u8,
    /// Whether the acknowledgment bit was set.
    pub acknowledged: bool,
    /// The 14 payload bytes.
    pub payload: Bytes,
    /// Trailing checksum byte.
    pub checksum: u8,
}

/// Encode a V1 frame into `dst`.
pub fn encode_frame(opcode: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: PAYLOAD_LEN,
        });
    }
    let start = dst.len();
    dst.reserve(FRAME_LEN);
    dst.put_u8(opcode);
    dst.put_slice(payload);
    dst.put_bytes(0, PAYLOAD_LEN - payload.len());
    let sum = checksum(&dst[start..]);
    dst.put_u8(sum);
    Ok(())
}

/// Strictly decode a V1 frame.
///
/// Checks run in order length, opcode, checksum; the first failure wins.
pub fn decode_frame(buf: &[u8], expected_opcode: u8) -> Result<V1Frame> {
    if let Some(err) = inspect(buf, expected_opcode).into_iter().next() {
        return Err(err);
    }
    Ok(V1Frame {
        opcode: buf[0] & !ACK_FLAG,
        acknowledged: buf[0] & ACK_FLAG != 0,
        payload: Bytes::copy_from_slice(&buf[1..FRAME_LEN - 1]),
        checksum: buf[FRAME_LEN - 1],
    })
}

/// Every validation problem with `buf`, in check order.
pub fn inspect(buf: &[u8], expected_opcode: u8) -> Vec<FrameError> {
    let mut issues = Vec::new();
    if buf.len() != FRAME_LEN {
        issues.push(FrameError::Length {
            expected: FRAME_LEN,
            actual: buf.len(),
        });
    }
    let Some((&last, body)) = buf.split_last() else {
        return issues;
    };
    let opcode = buf[0] & !ACK_FLAG;
    if opcode != expected_opcode {
        issues.push(FrameError::OpcodeMismatch {
            expected: expected_opcode,
            actual: opcode,
        });
    }
    let sum = checksum(body);
    if sum != last {
        issues.push(FrameError::Checksum {
            expected: sum,
            actual: last,
        });
    }
    issues
}

/// Accumulates V1 response frames for one command.
///
/// Frames are kept whether or not they validate: the device is known to
/// send slightly off frames that still carry usable data.
#[derive(Debug)]
pub struct V1Codec {
    opcode: u8,
    frames: Vec<Bytes>,
}

impl V1Codec {
    pub fn new(opcode: u8) -> Self {
        Self {
            opcode,
            frames: Vec::new(),
        }
    }

    /// Frames stored so far.
    pub fn frames(&self) -> &[Bytes] {
        &self.frames
    }
}

impl FrameCodec for V1Codec {
    fn generation(&self) -> Generation {
        Generation::V1
    }

    fn opcode(&self) -> u8 {
        self.opcode
    }

    fn encode(&self, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
        encode_frame(self.opcode, payload, dst)
    }

    fn feed(&mut self, buf: &[u8]) -> Feed {
        let issues = inspect(buf, self.opcode);
        self.frames.push(Bytes::copy_from_slice(buf));
        Feed {
            accepted: true,
            issues,
        }
    }

    fn is_complete(&self) -> bool {
        !self.frames.is_empty()
    }

    fn frames_received(&self) -> usize {
        self.frames.len()
    }

    fn take(&mut self) -> Assembled {
        Assembled::Frames(mem::take(&mut self.frames))
    }
}
