use bluering_transport::Generation;
use bytes::{Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::v1::V1Codec;
use crate::v2::V2Codec;

/// Outcome of feeding one delivered buffer into a codec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    /// The buffer became part of the accumulated response.
    pub accepted: bool,
    /// Validation problems noticed on this buffer.
    pub issues: Vec<FrameError>,
}

/// A response as assembled by a codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembled {
    /// V1: every stored frame exactly as received.
    Frames(Vec<Bytes>),
    /// V2: the running buffer and the payload slice its header announced.
    Payload { raw: Bytes, payload: Bytes },
}

impl Assembled {
    /// Stored V1 frames, empty for V2 responses.
    pub fn frames(&self) -> &[Bytes] {
        match self {
            Assembled::Frames(frames) => frames,
            Assembled::Payload { .. } => &[],
        }
    }

    /// V2 payload, `None` for V1 responses.
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            Assembled::Frames(_) => None,
            Assembled::Payload { payload, .. } => Some(payload),
        }
    }

    /// Everything received, concatenated. Kept for diagnostics.
    pub fn raw(&self) -> Bytes {
        match self {
            Assembled::Frames(frames) => {
                let mut out = BytesMut::with_capacity(frames.iter().map(Bytes::len).sum());
                for frame in frames {
                    out.extend_from_slice(frame);
                }
                out.freeze()
            }
            Assembled::Payload { raw, .. } => raw.clone(),
        }
    }

    /// Nothing was accumulated.
    pub fn is_empty(&self) -> bool {
        match self {
            Assembled::Frames(frames) => frames.is_empty(),
            Assembled::Payload { raw, .. } => raw.is_empty(),
        }
    }
}

/// Common interface of the two frame formats.
///
/// A codec is bound to one command opcode and accumulates exactly one
/// response. Completion here is the format-level notion only (a V1 frame
/// arrived, or the V2 length was reached); command-specific rules are layered
/// on top by the caller.
pub trait FrameCodec: Send {
    /// Protocol generation this codec speaks.
    fn generation(&self) -> Generation;

    /// Opcode responses are validated against.
    fn opcode(&self) -> u8;

    /// Append the wire form of a command carrying `payload` to `dst`.
    fn encode(&self, payload: &[u8], dst: &mut BytesMut) -> Result<()>;

    /// Feed one delivered buffer.
    fn feed(&mut self, buf: &[u8]) -> Feed;

    /// Format-level completion.
    fn is_complete(&self) -> bool;

    /// Number of buffers accepted so far.
    fn frames_received(&self) -> usize;

    /// Hand out the accumulated response, leaving the codec empty.
    fn take(&mut self) -> Assembled;
}

/// Codec for the given generation, bound to `opcode`.
pub fn codec_for(generation: Generation, opcode: u8) -> Box<dyn FrameCodec> {
    match generation {
        Generation::V1 => Box::new(V1Codec::new(opcode)),
        Generation::V2 => Box::new(V2Codec::new(opcode)),
    }
}
