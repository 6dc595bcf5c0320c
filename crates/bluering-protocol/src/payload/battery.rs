use crate::payload::{byte_at, DecodeError, Response};
use crate::record::{BatteryStatus, Decoded};

/// Byte 1 is the charge percentage, a non-zero byte 2 means charging.
pub fn decode(response: &Response<'_>) -> Result<Decoded, DecodeError> {
    let frame = response.first_frame()?;
    Ok(Decoded::Battery(BatteryStatus {
        percent: byte_at(frame, 1, "battery level")?,
        charging: byte_at(frame, 2, "charging flag")? != 0,
    }))
}
