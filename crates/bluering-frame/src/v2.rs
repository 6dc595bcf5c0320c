//! Generation 2 framing.
//!
//! Commands:
//! ```text
//! ┌──────────┬──────────┬────────────────────┬──────────┐
//! │ Sync     │ Opcode   │ Payload            │ Checksum │
//! │ 0xBC     │ (1B)     │ (variable)         │ (1B)     │
//! └──────────┴──────────┴────────────────────┴──────────┘
//! ```
//! The command carries no length; the device takes it from the write size.
//!
//! Responses:
//! ```text
//! ┌──────────┬──────────┬────────────┬────────────┬─────────────────────┐
//! │ Sync     │ Opcode   │ Length     │ Check      │ Payload             │
//! │ 0xBC     │ (1B)     │ (2B LE)    │ (2B)       │ (Length bytes)      │
//! └──────────┴──────────┴────────────┴────────────┴─────────────────────┘
//! ```
//! Only the first notification carries the header; the rest of the payload
//! follows in raw continuation notifications. The check field is carried but
//! never verified.

use bluering_transport::Generation;
use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::checksum::checksum;
use crate::codec::{Assembled, Feed, FrameCodec};
use crate::error::{FrameError, Result};

/// Sync byte opening every V2 frame.
pub const SYNC: u8 = 0xBC;

/// Response header size: sync, opcode, length (2), check (2).
pub const HEADER_LEN: usize = 6;

/// Parsed header of the first response notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V2Header {
    pub opcode: u8,
    /// Payload length announced by the device.
    pub length: u16,
    /// Integrity field, carried verbatim.
    pub check: [u8; 2],
}

impl V2Header {
    /// Parse the header at the start of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(FrameError::TooShort {
                len: buf.len(),
                min: HEADER_LEN,
            });
        }
        if buf[0] != SYNC {
            return Err(FrameError::BadSync(buf[0]));
        }
        Ok(Self {
            opcode: buf[1],
            length: u16::from_le_bytes([buf[2], buf[3]]),
            check: [buf[4], buf[5]],
        })
    }

    /// Total bytes of a response carrying this header.
    pub fn total_len(&self) -> usize {
        HEADER_LEN + self.length as usize
    }
}

/// Encode a V2 command frame into `dst`.
pub fn encode_frame(opcode: u8, payload: &[u8], dst: &mut BytesMut) {
    let start = dst.len();
    dst.reserve(payload.len() + 3);
    dst.put_u8(SYNC);
    dst.put_u8(opcode);
    dst.put_slice(payload);
    let sum = checksum(&dst[start..]);
    dst.put_u8(sum);
}

/// Reassembles one V2 response from any number of notifications.
#[derive(Debug)]
pub struct V2Codec {
    opcode: u8,
    buf: BytesMut,
    expected: Option<usize>,
    chunks: usize,
}

impl V2Codec {
    pub fn new(opcode: u8) -> Self {
        Self {
            opcode,
            buf: BytesMut::new(),
            expected: None,
            chunks: 0,
        }
    }

    /// Payload length announced by the header, once seen.
    pub fn expected_payload_len(&self) -> Option<usize> {
        self.expected
    }

    /// Bytes accumulated so far, header included.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

impl FrameCodec for V2Codec {
    fn generation(&self) -> Generation {
        Generation::V2
    }

    fn opcode(&self) -> u8 {
        self.opcode
    }

    fn encode(&self, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
        encode_frame(self.opcode, payload, dst);
        Ok(())
    }

    fn feed(&mut self, buf: &[u8]) -> Feed {
        if self.is_complete() {
            trace!(len = buf.len(), "ignoring buffer after complete response");
            return Feed::default();
        }

        let mut issues = Vec::new();
        if self.expected.is_none() {
            let header = match V2Header::parse(buf) {
                Ok(header) => header,
                Err(err) => {
                    return Feed {
                        accepted: false,
                        issues: vec![err],
                    }
                }
            };
            if header.opcode != self.opcode {
                issues.push(FrameError::OpcodeMismatch {
                    expected: self.opcode,
                    actual: header.opcode,
                });
            }
            self.expected = Some(header.length as usize);
        }

        self.buf.extend_from_slice(buf);
        self.chunks += 1;
        Feed {
            accepted: true,
            issues,
        }
    }

    fn is_complete(&self) -> bool {
        self.expected
            .is_some_and(|len| self.buf.len() >= len + HEADER_LEN)
    }

    fn frames_received(&self) -> usize {
        self.chunks
    }

    fn take(&mut self) -> Assembled {
        let expected = self.expected.take().unwrap_or(0);
        self.chunks = 0;
        let raw = self.buf.split().freeze();
        let start = HEADER_LEN.min(raw.len());
        let end = (HEADER_LEN + expected).min(raw.len());
        let payload = raw.slice(start..end);
        Assembled::Payload { raw, payload }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn response(opcode: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![SYNC, opcode];
        out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        out.extend_from_slice(&[0xAA, 0x55]);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn command_wire_form() {
        let mut buf = BytesMut::new();
        encode_frame(0x2A, &[0x01, 0x00, 0xFF, 0x00, 0xFF], &mut buf);
        assert_eq!(
            buf.as_ref(),
            &[0xBC, 0x2A, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0xE5]
        );
    }

    #[test]
    fn single_notification_response() {
        let mut codec = V2Codec::new(0x27);
        let feed = codec.feed(&response(0x27, b"sleep"));
        assert!(feed.accepted && feed.issues.is_empty());
        assert!(codec.is_complete());
        assert_eq!(codec.take().payload().unwrap().as_ref(), b"sleep");
    }

    #[test]
    fn continuation_notifications_are_concatenated() {
        let wire = response(0x2A, &[7u8; 40]);
        let mut codec = V2Codec::new(0x2A);
        codec.feed(&wire[..20]);
        assert!(!codec.is_complete());
        assert_eq!(codec.expected_payload_len(), Some(40));
        codec.feed(&wire[20..]);
        assert!(codec.is_complete());
        assert_eq!(codec.frames_received(), 2);
        assert_eq!(codec.take().payload().unwrap().as_ref(), &[7u8; 40]);
    }

    #[test]
    fn trailing_bytes_beyond_length_are_kept_raw_only() {
        let mut wire = response(0x27, b"ab");
        wire.push(0x99);
        let mut codec = V2Codec::new(0x27);
        codec.feed(&wire);
        match codec.take() {
            Assembled::Payload { raw, payload } => {
                assert_eq!(raw.len(), wire.len());
                assert_eq!(payload.as_ref(), b"ab");
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn short_first_buffer_is_dropped() {
        let mut codec = V2Codec::new(0x27);
        let feed = codec.feed(&[0xBC, 0x27, 0x01]);
        assert!(!feed.accepted);
        assert_eq!(feed.issues, vec![FrameError::TooShort { len: 3, min: 6 }]);
        assert_eq!(codec.buffered(), 0);
        assert_eq!(codec.expected_payload_len(), None);
    }

    #[test]
    fn bad_sync_is_dropped() {
        let mut codec = V2Codec::new(0x27);
        let feed = codec.feed(&[0x00, 0x27, 0x00, 0x00, 0x00, 0x00]);
        assert!(!feed.accepted);
        assert_eq!(feed.issues, vec![FrameError::BadSync(0x00)]);
    }

    #[test]
    fn opcode_mismatch_is_observed_not_fatal() {
        let mut codec = V2Codec::new(0x27);
        let feed = codec.feed(&response(0x2A, b""));
        assert!(feed.accepted);
        assert!(matches!(
            feed.issues[0],
            FrameError::OpcodeMismatch { expected: 0x27, actual: 0x2A }
        ));
        assert!(codec.is_complete());
    }

    #[test]
    fn buffers_after_completion_are_ignored() {
        let mut codec = V2Codec::new(0x27);
        codec.feed(&response(0x27, b"x"));
        let late = codec.feed(b"late");
        assert!(!late.accepted);
        assert_eq!(codec.take().raw().len(), HEADER_LEN + 1);
    }

    proptest! {
        #[test]
        fn any_chunking_yields_the_same_payload(
            payload in prop::collection::vec(any::<u8>(), 0..300),
            cuts in prop::collection::vec(1usize..40, 0..20),
        ) {
            let wire = response(0x2A, &payload);

            let mut whole = V2Codec::new(0x2A);
            whole.feed(&wire);
            prop_assert!(whole.is_complete());
            let expected = whole.take();

            // The first chunk must hold the full header.
            let mut chunked = V2Codec::new(0x2A);
            let mut offset = 0usize;
            let mut first = true;
            let mut sizes = cuts.into_iter();
            while offset < wire.len() {
                let mut size = sizes.next().unwrap_or(wire.len());
                if first {
                    size = size.max(HEADER_LEN);
                    first = false;
                }
                let end = (offset + size).min(wire.len());
                prop_assert!(!chunked.is_complete());
                chunked.feed(&wire[offset..end]);
                offset = end;
            }
            prop_assert!(chunked.is_complete());
            let actual = chunked.take();
            prop_assert_eq!(actual.payload(), expected.payload());
        }
    }
}
