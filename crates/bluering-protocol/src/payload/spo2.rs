//! SpO2 history (V2).
//!
//! The payload is a run of 49-byte day groups: days ago, then 24 hourly
//! `(low, high)` pairs.

use chrono::Duration;
use tracing::warn;

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::payload::{day_start, DecodeError, Response};
use crate::record::{Decoded, Spo2Sample};

const DAY_GROUP_LEN: usize = 49;

/// Request shared by the V2 history commands.
pub(crate) const HISTORY_REQUEST: [u8; 5] = [0x01, 0x00, 0xFF, 0x00, 0xFF];

pub fn encode(_: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    Ok(HISTORY_REQUEST.to_vec())
}

pub fn decode(response: &Response<'_>) -> std::result::Result<Decoded, DecodeError> {
    let payload = response.payload()?;
    let groups = payload.chunks_exact(DAY_GROUP_LEN);
    if !groups.remainder().is_empty() {
        warn!(
            len = payload.len(),
            payload = %hex::encode(payload),
            "spo2 payload is not a whole number of days"
        );
    }

    let today = response.today();
    let mut samples = Vec::new();
    for group in groups {
        let start = day_start(today, group[0]);
        for (hour, pair) in group[1..].chunks_exact(2).enumerate() {
            let (low, high) = (pair[0], pair[1]);
            if low == 0 && high == 0 {
                continue;
            }
            samples.push(Spo2Sample {
                timestamp: start + Duration::hours(hour as i64),
                low,
                high,
            });
        }
    }
    Ok(Decoded::Spo2 { samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::testing::{payload, utc_config};

    fn decode_payload(bytes: &[u8]) -> Decoded {
        let assembled = payload(0x2A, bytes);
        let config = utc_config((2024, 10, 22));
        let params = Params::new();
        decode(&Response {
            command: "spo2log",
            params: &params,
            assembled: &assembled,
            set_aside: &[],
            config: &config,
        })
        .unwrap()
    }

    fn day(ago: u8, readings: &[(usize, u8, u8)]) -> Vec<u8> {
        let mut group = vec![0u8; DAY_GROUP_LEN];
        group[0] = ago;
        for &(hour, low, high) in readings {
            group[1 + hour * 2] = low;
            group[2 + hour * 2] = high;
        }
        group
    }

    #[test]
    fn hourly_pairs_across_days() {
        let mut bytes = day(1, &[(2, 94, 97)]);
        bytes.extend(day(0, &[(0, 0, 99), (23, 95, 0)]));
        let Decoded::Spo2 { samples } = decode_payload(&bytes) else {
            panic!("expected spo2 samples");
        };
        let rendered: Vec<String> = samples
            .iter()
            .map(|s| format!("{} {}-{}", s.timestamp, s.low, s.high))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "2024-10-21 02:00:00 94-97",
                "2024-10-22 00:00:00 0-99",
                "2024-10-22 23:00:00 95-0",
            ]
        );
    }

    #[test]
    fn partial_day_is_ignored() {
        let mut bytes = day(0, &[(5, 90, 96)]);
        bytes.extend_from_slice(&[3, 91, 92]);
        let Decoded::Spo2 { samples } = decode_payload(&bytes) else {
            panic!("expected spo2 samples");
        };
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn empty_payload_has_no_samples() {
        assert_eq!(decode_payload(&[]), Decoded::Spo2 { samples: vec![] });
    }
}
