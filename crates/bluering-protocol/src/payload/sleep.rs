//! Sleep history (V2).
//!
//! ```text
//! ┌──────┬─────────────────────────────────────────────────────────────┬─────┐
//! │ Days │ Segment                                                     │ ... │
//! │ (1B) │ ago (1B) | len (1B) | start (2B LE) | end (2B LE) | stages  │     │
//! └──────┴─────────────────────────────────────────────────────────────┴─────┘
//! ```
//!
//! Start and end are minutes from the midnight `ago` days back. A start
//! later than the end means sleep began the evening before. Stages are
//! `(code, minutes)` pairs.

use chrono::Duration;
use tracing::warn;

use crate::payload::{byte_at, day_start, u16_le, DecodeError, Response};
use crate::record::{Decoded, SleepPhase, SleepSegment, SleepStage};

const MINUTES_PER_DAY: i64 = 1440;

pub fn decode(response: &Response<'_>) -> Result<Decoded, DecodeError> {
    let payload = response.payload()?;
    let days = byte_at(payload, 0, "sleep day count")?;
    let today = response.today();

    let mut segments = Vec::new();
    let mut rest = &payload[1..];
    while !rest.is_empty() {
        let ago = rest[0];
        let len = usize::from(byte_at(rest, 1, "sleep segment header")?);
        let content = rest.get(2..2 + len).ok_or_else(|| {
            DecodeError::Malformed(format!(
                "sleep segment of {len} bytes overruns payload ({} left)",
                rest.len() - 2
            ))
        })?;
        segments.push(segment(ago, content, today)?);
        rest = &rest[2 + len..];
    }

    if segments.len() != usize::from(days) {
        warn!(
            announced = days,
            found = segments.len(),
            "sleep day count mismatch"
        );
    }
    Ok(Decoded::Sleep { segments })
}

fn segment(
    ago: u8,
    content: &[u8],
    today: chrono::NaiveDate,
) -> Result<SleepSegment, DecodeError> {
    let mut start = i64::from(u16_le(content, 0, "sleep start")?);
    let end = i64::from(u16_le(content, 2, "sleep end")?);
    if start > end {
        start -= MINUTES_PER_DAY;
    }
    let midnight = day_start(today, ago);
    let stages = content[4..]
        .chunks_exact(2)
        .map(|pair| SleepPhase {
            stage: SleepStage::from_code(pair[0]),
            minutes: pair[1],
        })
        .collect();
    Ok(SleepSegment {
        start: midnight + Duration::minutes(start),
        end: midnight + Duration::minutes(end),
        stages,
    })
}
