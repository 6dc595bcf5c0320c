//! Per-command payload builders and response decoders.
//!
//! Builders turn [`Params`] into the bytes that follow the opcode. Decoders
//! see the assembled response through [`Response`] and never touch framing
//! beyond the fixed per-frame trimming the logs use.

pub mod activity;
pub mod battery;
pub mod clock;
pub mod hr_log;
pub mod measure;
pub mod preference;
pub mod profile;
pub mod sleep;
pub mod spo2;
pub mod stress;

use bluering_frame::Assembled;
use bytes::Bytes;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::record::Decoded;

/// Problems found while decoding an assembled response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("no response data")]
    Empty,

    #[error("{what} truncated ({have} bytes, need {need})")]
    Short {
        what: &'static str,
        have: usize,
        need: usize,
    },

    #[error("invalid BCD byte {0:#04x}")]
    InvalidBcd(u8),

    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("timestamp {0} is out of range")]
    Timestamp(i64),

    #[error("{0}")]
    Malformed(String),
}

/// An assembled response plus what the decoder needs to interpret it.
#[derive(Debug, Clone, Copy)]
pub struct Response<'a> {
    pub command: &'static str,
    pub params: &'a Params,
    pub assembled: &'a Assembled,
    /// Frames the completion rule kept out of the response (V1 notices).
    pub set_aside: &'a [Bytes],
    pub config: &'a ProtocolConfig,
}

impl<'a> Response<'a> {
    /// Stored V1 frames.
    pub fn frames(&self) -> &'a [Bytes] {
        self.assembled.frames()
    }

    pub fn first_frame(&self) -> std::result::Result<&'a Bytes, DecodeError> {
        self.frames().first().ok_or(DecodeError::Empty)
    }

    /// V2 payload.
    pub fn payload(&self) -> std::result::Result<&'a Bytes, DecodeError> {
        self.assembled.payload().ok_or(DecodeError::Empty)
    }

    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }
}

/// Builder for commands that send nothing after the opcode.
pub(crate) fn no_payload(_: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    Ok(Vec::new())
}

/// Decoder for commands whose only result is that the device answered.
pub(crate) fn acknowledge(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    if response.assembled.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(Decoded::Acknowledged {
        command: response.command,
    })
}

pub(crate) fn byte_at(
    buf: &[u8],
    index: usize,
    what: &'static str,
) -> std::result::Result<u8, DecodeError> {
    buf.get(index).copied().ok_or(DecodeError::Short {
        what,
        have: buf.len(),
        need: index + 1,
    })
}

pub(crate) fn u16_le(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> std::result::Result<u16, DecodeError> {
    match buf.get(offset..offset + 2) {
        Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
        None => Err(DecodeError::Short {
            what,
            have: buf.len(),
            need: offset + 2,
        }),
    }
}

pub(crate) fn u32_le(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> std::result::Result<u32, DecodeError> {
    match buf.get(offset..offset + 4) {
        Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(DecodeError::Short {
            what,
            have: buf.len(),
            need: offset + 4,
        }),
    }
}

/// Concatenate V1 log frames without their 2-byte head and checksum byte.
pub(crate) fn trimmed_concat(frames: &[Bytes]) -> Vec<u8> {
    let mut bulk = Vec::with_capacity(frames.len() * 13);
    for frame in frames {
        if frame.len() > 3 {
            bulk.extend_from_slice(&frame[2..frame.len() - 1]);
        }
    }
    bulk
}

/// Pack `0..=99` as two BCD digits.
pub(crate) fn bcd_encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

pub(crate) fn bcd_decode(byte: u8) -> std::result::Result<u8, DecodeError> {
    let (hi, lo) = (byte >> 4, byte & 0x0F);
    if hi > 9 || lo > 9 {
        return Err(DecodeError::InvalidBcd(byte));
    }
    Ok(hi * 10 + lo)
}

/// Midnight starting the day `days_ago` days before `today`.
pub(crate) fn day_start(today: NaiveDate, days_ago: u8) -> NaiveDateTime {
    (today - Duration::days(i64::from(days_ago))).and_time(NaiveTime::MIN)
}
