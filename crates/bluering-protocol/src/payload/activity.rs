//! Activity (step) log.
//!
//! The first frame announces how many data frames follow and whether
//! calories use the newer ×10 scale. Each data frame holds one quarter-hour
//! bucket:
//!
//! ```text
//! ┌────────┬──────────────┬─────────┬───────┬───────┬──────────┬─────────┬──────────┬──────────┐
//! │ Opcode │ Date (BCD)   │ Quarter │ Index │ Count │ Calories │ Steps   │ Distance │ Checksum │
//! │ (1B)   │ yy mm dd (3B)│ (1B)    │ (1B)  │ (1B)  │ (2B LE)  │ (2B LE) │ (2B LE)  │ (1B)     │
//! └────────┴──────────────┴─────────┴───────┴───────┴──────────┴─────────┴──────────┴──────────┘
//! ```

use chrono::NaiveDate;

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::payload::{bcd_decode, byte_at, u16_le, DecodeError, Response};
use crate::record::{Decoded, StepRecord};

/// Fixed request the vendor app sends.
const REQUEST: [u8; 5] = [0x00, 0x0F, 0x00, 0x5F, 0x01];

pub fn encode(_: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    Ok(REQUEST.to_vec())
}

pub fn decode(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    let (first, data) = response
        .frames()
        .split_first()
        .ok_or(DecodeError::Empty)?;
    let scaled = byte_at(first, 3, "activity header")? == 1;

    let records = data
        .iter()
        .map(|frame| step_record(frame, scaled))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Decoded::Steps { records })
}

fn step_record(frame: &[u8], scaled: bool) -> std::result::Result<StepRecord, DecodeError> {
    let year = bcd_decode(byte_at(frame, 1, "activity date")?)?;
    let month = bcd_decode(byte_at(frame, 2, "activity date")?)?;
    let day = bcd_decode(byte_at(frame, 3, "activity date")?)?;
    let time_index = byte_at(frame, 4, "activity quarter")?;

    let (year, month, day) = (2000 + i32::from(year), u32::from(month), u32::from(day));
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DecodeError::InvalidDate { year, month, day })?;
    let hour = u32::from(time_index / 4);
    let minute = u32::from(time_index % 4) * 15;
    let timestamp = date.and_hms_opt(hour, minute, 0).ok_or_else(|| {
        DecodeError::Malformed(format!("quarter-hour index {time_index} is past midnight"))
    })?;

    let calories = u32::from(u16_le(frame, 7, "activity calories")?);
    Ok(StepRecord {
        timestamp,
        time_index,
        calories: if scaled { calories * 10 } else { calories },
        steps: u16_le(frame, 9, "activity steps")?,
        distance: u16_le(frame, 11, "activity distance")?,
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::payload::testing::{frames, utc_config, v1_frame};

    fn data_frame(date: [u8; 3], quarter: u8, index: u8, count: u8, values: [u16; 3]) -> Bytes {
        let mut bytes = vec![0x43, date[0], date[1], date[2], quarter, index, count];
        for value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        v1_frame(&bytes)
    }

    fn decode_frames(list: Vec<Bytes>) -> std::result::Result<Decoded, DecodeError> {
        let assembled = frames(list);
        let config = utc_config((2024, 10, 22));
        let params = Params::new();
        decode(&Response {
            command: "actlog",
            params: &params,
            assembled: &assembled,
            set_aside: &[],
            config: &config,
        })
    }

    #[test]
    fn request_payload() {
        assert_eq!(
            encode(&Params::new(), &ProtocolConfig::default()).unwrap(),
            vec![0x00, 0x0F, 0x00, 0x5F, 0x01]
        );
    }

    #[test]
    fn decode_scaled_calories() {
        let decoded = decode_frames(vec![
            v1_frame(&[0x43, 0xF0, 2, 1]),
            data_frame([0x24, 0x10, 0x22], 37, 0, 2, [12, 340, 250]),
            data_frame([0x24, 0x10, 0x22], 38, 1, 2, [3, 80, 60]),
        ])
        .unwrap();
        let Decoded::Steps { records } = decoded else {
            panic!("unexpected {decoded:?}");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 10, 22)
                .and_then(|d| d.and_hms_opt(9, 15, 0))
                .unwrap()
        );
        assert_eq!(records[0].calories, 120);
        assert_eq!(records[0].steps, 340);
        assert_eq!(records[0].distance, 250);
        assert_eq!(records[1].time_index, 38);
    }

    #[test]
    fn unscaled_calories() {
        let decoded = decode_frames(vec![
            v1_frame(&[0x43, 0xF0, 1, 0]),
            data_frame([0x24, 0x01, 0x05], 0, 0, 1, [42, 1, 1]),
        ])
        .unwrap();
        let Decoded::Steps { records } = decoded else {
            panic!("unexpected {decoded:?}");
        };
        assert_eq!(records[0].calories, 42);
    }

    #[test]
    fn non_decimal_date_is_rejected() {
        let err = decode_frames(vec![
            v1_frame(&[0x43, 0xF0, 1, 0]),
            data_frame([0x24, 0x1A, 0x05], 0, 0, 1, [0, 0, 0]),
        ])
        .unwrap_err();
        assert_eq!(err, DecodeError::InvalidBcd(0x1A));
    }

    #[test]
    fn impossible_date_is_rejected() {
        let err = decode_frames(vec![
            v1_frame(&[0x43, 0xF0, 1, 0]),
            data_frame([0x23, 0x02, 0x30], 0, 0, 1, [0, 0, 0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidDate {
                year: 2023,
                month: 2,
                day: 30
            }
        );
    }
}
