//! Stress log for one day.
//!
//! The first frame's byte 3 is the sampling period in minutes, applied to
//! the whole response. The remaining frames, trimmed and concatenated, start
//! with the "days ago" the device actually answered for and end with a
//! three-byte trailer.

use chrono::Duration;

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::payload::{byte_at, day_start, trimmed_concat, DecodeError, Response};
use crate::record::{Decoded, StressSample};

const TRAILER_LEN: usize = 3;

pub fn encode(params: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    let ago = params.u8_in("ago", 0..=u8::MAX)?.unwrap_or(0);
    Ok(vec![ago])
}

pub fn decode(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    let (first, rest) = response
        .frames()
        .split_first()
        .ok_or(DecodeError::Empty)?;
    let period = byte_at(first, 3, "stress period")?;
    let bulk = trimmed_concat(rest);
    let Some((&ago, body)) = bulk.split_first() else {
        return Ok(Decoded::NoData);
    };

    let start = day_start(response.today(), ago);
    let end = body.len().saturating_sub(TRAILER_LEN);
    let samples = body[..end]
        .iter()
        .enumerate()
        .filter(|(_, level)| **level != 0)
        .map(|(i, &level)| StressSample {
            timestamp: start + Duration::minutes(i as i64 * i64::from(period)),
            level,
        })
        .collect();
    Ok(Decoded::Stress {
        period_minutes: period,
        samples,
    })
}
