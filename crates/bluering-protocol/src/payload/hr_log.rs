//! Heart-rate log for one day.
//!
//! The request names the day by the unix time of the midnight that ends it.
//! The response frames, trimmed and concatenated, carry a header whose bytes
//! 13..17 are an anchor timestamp, followed by one sample per 5 minutes.

use chrono::NaiveTime;

use crate::config::ProtocolConfig;
use crate::error::{ProtocolError, Result};
use crate::params::Params;
use crate::payload::{trimmed_concat, u32_le, DecodeError, Response};
use crate::record::{Decoded, HrSample};

const DAY_SECS: i64 = 86_400;
const SAMPLE_SECS: i64 = 300;
const SAMPLES_OFFSET: usize = 17;

pub fn encode(params: &Params, config: &ProtocolConfig) -> Result<Vec<u8>> {
    let date = params.date("date")?.unwrap_or_else(|| config.today());
    let midnight = config
        .time_zone
        .timestamp_of(date.and_time(NaiveTime::MIN))
        .ok_or_else(|| ProtocolError::invalid("date", format!("{date} has no midnight")))?;
    let next = u32::try_from(midnight + DAY_SECS)
        .map_err(|_| ProtocolError::invalid("date", format!("{date} is out of range")))?;
    Ok(next.to_le_bytes().to_vec())
}

pub fn decode(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    let bulk = trimmed_concat(response.frames());
    if bulk.len() < SAMPLES_OFFSET {
        return Ok(Decoded::NoData);
    }
    let anchor = i64::from(u32_le(&bulk, 13, "hr log anchor")?);
    let zone = response.config.time_zone;

    let samples = bulk[SAMPLES_OFFSET..]
        .iter()
        .enumerate()
        .filter(|(_, bpm)| **bpm != 0)
        .map(|(i, &bpm)| {
            let epoch = anchor - DAY_SECS + i as i64 * SAMPLE_SECS;
            zone.wall_clock(epoch)
                .map(|timestamp| HrSample {
                    timestamp,
                    epoch,
                    bpm,
                })
                .ok_or(DecodeError::Timestamp(epoch))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Decoded::HeartRate { samples })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::payload::testing::{frames, utc_config, v1_frame};

    fn decode_frames(list: Vec<Bytes>) -> Decoded {
        let assembled = frames(list);
        let config = utc_config((2024, 10, 22));
        let params = Params::new();
        decode(&Response {
            command: "hrlog",
            params: &params,
            assembled: &assembled,
            set_aside: &[],
            config: &config,
        })
        .unwrap()
    }

    /// Three frames carrying 39 trimmed bytes: header up to the anchor,
    /// then 22 samples.
    fn three_frames(anchor: u32, samples: &[u8; 22]) -> Vec<Bytes> {
        let mut bulk = vec![0u8; 13];
        bulk.extend_from_slice(&anchor.to_le_bytes());
        bulk.extend_from_slice(samples);
        assert_eq!(bulk.len(), 39);
        bulk.chunks(13)
            .enumerate()
            .map(|(seq, chunk)| {
                let mut bytes = vec![0x15, seq as u8];
                bytes.extend_from_slice(chunk);
                v1_frame(&bytes)
            })
            .collect()
    }

    #[test]
    fn request_is_next_midnight() {
        let params = Params::new().with("date", "2024-10-22");
        let payload = encode(&params, &utc_config((2024, 1, 1))).unwrap();
        assert_eq!(payload, (1_729_555_200u32 + 86_400).to_le_bytes().to_vec());
    }

    #[test]
    fn request_defaults_to_today() {
        let payload = encode(&Params::new(), &utc_config((2024, 10, 22))).unwrap();
        assert_eq!(payload, 1_729_641_600u32.to_le_bytes().to_vec());
    }

    #[test]
    fn anchor_and_sample_times() {
        let anchor = 1_729_641_600u32;
        let mut samples = [0u8; 22];
        samples[0] = 61;
        samples[5] = 72;
        samples[21] = 90;
        let decoded = decode_frames(three_frames(anchor, &samples));
        let Decoded::HeartRate { samples } = decoded else {
            panic!("unexpected {decoded:?}");
        };
        let base = i64::from(anchor) - 86_400;
        assert_eq!(samples.len(), 3);
        assert_eq!((samples[0].epoch, samples[0].bpm), (base, 61));
        assert_eq!((samples[1].epoch, samples[1].bpm), (base + 5 * 300, 72));
        assert_eq!((samples[2].epoch, samples[2].bpm), (base + 21 * 300, 90));
        assert_eq!(samples[1].timestamp.to_string(), "2024-10-22 00:25:00");
    }

    #[test]
    fn short_log_is_no_data() {
        let decoded = decode_frames(vec![v1_frame(&[0x15, 0, 1, 0, 0])]);
        assert_eq!(decoded, Decoded::NoData);
    }
}
