//! Clock setting.
//!
//! The device keeps wall-clock time, so the six fields are the wall-clock
//! components in the configured zone, never converted to UTC.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::payload::{bcd_encode, DecodeError, Response};
use crate::record::{ClockSet, Decoded};

/// Opcode of the notice the device sends before acknowledging.
pub const PACKET_SIZE_NOTICE: u8 = 0x2F;

/// Trailing byte after the date fields; the vendor app always sends 1.
const LOCALE_MARKER: u8 = 0x01;

pub fn encode(params: &Params, config: &ProtocolConfig) -> Result<Vec<u8>> {
    let time = params
        .datetime("time")?
        .unwrap_or_else(|| config.time_zone.now());
    Ok(clock_fields(time).to_vec())
}

/// BCD year (two digits), month, day, hour, minute, second and the marker.
pub fn clock_fields(time: NaiveDateTime) -> [u8; 7] {
    let year = time.year().rem_euclid(100) as u8;
    [
        bcd_encode(year),
        bcd_encode(time.month() as u8),
        bcd_encode(time.day() as u8),
        bcd_encode(time.hour() as u8),
        bcd_encode(time.minute() as u8),
        bcd_encode(time.second() as u8),
        LOCALE_MARKER,
    ]
}

pub fn decode(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    response.first_frame()?;
    let packet_size = response
        .set_aside
        .iter()
        .rev()
        .find(|frame| frame.first() == Some(&PACKET_SIZE_NOTICE))
        .and_then(|frame| frame.get(1).copied());
    Ok(Decoded::ClockSet(ClockSet { packet_size }))
}
