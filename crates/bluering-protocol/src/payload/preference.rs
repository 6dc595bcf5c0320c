//! Logging preferences (HR period, SpO2, stress and HRV toggles).
//!
//! Every preference command has a read mode (`01`) and a write mode (`02`
//! followed by the new values). A command is in write mode as soon as any
//! value parameter is given.

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::payload::{acknowledge, byte_at, DecodeError, Response};
use crate::record::{Decoded, PreferenceState};

const READ: u8 = 0x01;
const WRITE: u8 = 0x02;

const DEFAULT_HR_PERIOD: u8 = 60;

fn write_mode(params: &Params) -> bool {
    params.contains("enabled") || params.contains("period")
}

/// HR logging: `02 enabled(01/00) period` or `01`.
pub fn encode_hr(params: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    if !write_mode(params) {
        return Ok(vec![READ]);
    }
    let enabled = params.yes_no("enabled")?.unwrap_or(true);
    let period = params
        .u8_in("period", 1..=u8::MAX)?
        .unwrap_or(DEFAULT_HR_PERIOD);
    Ok(vec![WRITE, u8::from(enabled), period])
}

/// Simple toggles: `02 enabled(01/02)` or `01`.
pub fn encode_toggle(params: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    if !write_mode(params) {
        return Ok(vec![READ]);
    }
    let enabled = params.yes_no("enabled")?.unwrap_or(true);
    Ok(vec![WRITE, if enabled { 0x01 } else { 0x02 }])
}

pub fn decode_hr(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    if write_mode(response.params) {
        return acknowledge(response);
    }
    let frame = response.first_frame()?;
    Ok(Decoded::Preference(PreferenceState {
        enabled: byte_at(frame, 2, "hr preference")? == 1,
        period_minutes: Some(byte_at(frame, 3, "hr period")?),
    }))
}

pub fn decode_toggle(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    if write_mode(response.params) {
        return acknowledge(response);
    }
    let frame = response.first_frame()?;
    Ok(Decoded::Preference(PreferenceState {
        enabled: byte_at(frame, 2, "preference")? == 1,
        period_minutes: None,
    }))
}
