//! On-demand measurements.

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::payload::{byte_at, DecodeError, Response};
use crate::record::{Decoded, HrMeasurement};

pub fn encode_hr(_: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    Ok(vec![0x69, 0x01])
}

pub fn encode_spo2(_: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    Ok(vec![0x6A, 0x03, 0x32])
}

/// Byte 2 is an error code, byte 3 the final reading; frames with neither
/// mean the ring is still measuring.
pub fn decode_hr(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    let frames = response.frames();
    if frames.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut result = HrMeasurement {
        bpm: None,
        error: None,
        interim_frames: 0,
    };
    for frame in frames {
        let error = byte_at(frame, 2, "measurement status")?;
        let bpm = byte_at(frame, 3, "measurement value")?;
        if error != 0 {
            result.error = Some(error);
            break;
        }
        if bpm != 0 {
            result.bpm = Some(bpm);
            break;
        }
        result.interim_frames += 1;
    }
    Ok(Decoded::HrMeasurement(result))
}

pub fn decode_spo2(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    let frame = response.first_frame()?;
    Ok(Decoded::Spo2Measurement {
        status: byte_at(frame, 1, "measurement status")?,
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::payload::testing::{frames, utc_config, v1_frame};

    fn decode_with(
        decoder: fn(&Response<'_>) -> std::result::Result<Decoded, DecodeError>,
        list: Vec<Bytes>,
    ) -> Decoded {
        let assembled = frames(list);
        let config = utc_config((2024, 10, 22));
        let params = Params::new();
        decoder(&Response {
            command: "measure",
            params: &params,
            assembled: &assembled,
            set_aside: &[],
            config: &config,
        })
        .unwrap()
    }

    #[test]
    fn final_value_after_interim_frames() {
        let decoded = decode_with(
            decode_hr,
            vec![
                v1_frame(&[0x69, 0x01, 0x00, 0x00]),
                v1_frame(&[0x69, 0x01, 0x00, 0x00]),
                v1_frame(&[0x69, 0x01, 0x00, 72]),
            ],
        );
        assert_eq!(
            decoded,
            Decoded::HrMeasurement(HrMeasurement {
                bpm: Some(72),
                error: None,
                interim_frames: 2
            })
        );
    }

    #[test]
    fn error_code() {
        let decoded = decode_with(decode_hr, vec![v1_frame(&[0x69, 0x01, 0x02, 0x00])]);
        assert_eq!(
            decoded,
            Decoded::HrMeasurement(HrMeasurement {
                bpm: None,
                error: Some(2),
                interim_frames: 0
            })
        );
    }

    #[test]
    fn spo2_status() {
        let decoded = decode_with(decode_spo2, vec![v1_frame(&[0x6A, 0x00])]);
        assert_eq!(decoded, Decoded::Spo2Measurement { status: 0 });
    }
}
