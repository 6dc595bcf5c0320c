//! Typed results produced by the payload decoders.
//!
//! Timestamps are wall-clock times in the configured zone, matching how the
//! device itself keeps time.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Battery charge report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatteryStatus {
    pub percent: u8,
    pub charging: bool,
}

/// Result of setting the device clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockSet {
    /// Packet size the device announced while acknowledging, if it did.
    pub packet_size: Option<u8>,
}

/// One quarter-hour bucket of the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub timestamp: NaiveDateTime,
    /// Quarter hours since midnight.
    pub time_index: u8,
    pub calories: u32,
    pub steps: u16,
    pub distance: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HrSample {
    pub timestamp: NaiveDateTime,
    /// Unix time of the sample as reported by the device.
    pub epoch: i64,
    pub bpm: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StressSample {
    pub timestamp: NaiveDateTime,
    pub level: u8,
}

/// Hourly SpO2 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spo2Sample {
    pub timestamp: NaiveDateTime,
    pub low: u8,
    pub high: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    Light,
    Deep,
    Rem,
    Awake,
    Unknown(u8),
}

impl SleepStage {
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => SleepStage::Light,
            3 => SleepStage::Deep,
            4 => SleepStage::Rem,
            5 => SleepStage::Awake,
            other => SleepStage::Unknown(other),
        }
    }

    /// Single-letter abbreviation used in compact listings.
    pub fn letter(self) -> char {
        match self {
            SleepStage::Light => 'l',
            SleepStage::Deep => 'd',
            SleepStage::Rem => 'r',
            SleepStage::Awake => 'a',
            SleepStage::Unknown(_) => '?',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SleepPhase {
    pub stage: SleepStage,
    pub minutes: u8,
}

/// One night of sleep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepSegment {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub stages: Vec<SleepPhase>,
}

impl SleepSegment {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreferenceState {
    pub enabled: bool,
    /// Sampling period, for preferences that have one.
    pub period_minutes: Option<u8>,
}

/// Outcome of an on-demand heart-rate measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HrMeasurement {
    pub bpm: Option<u8>,
    /// Device error code, when the measurement failed.
    pub error: Option<u8>,
    /// "Still measuring" frames seen before the final one.
    pub interim_frames: usize,
}

/// Decoded result of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoded {
    Battery(BatteryStatus),
    /// The device accepted a command that carries no result.
    Acknowledged { command: &'static str },
    ClockSet(ClockSet),
    Steps { records: Vec<StepRecord> },
    HeartRate { samples: Vec<HrSample> },
    Stress {
        period_minutes: u8,
        samples: Vec<StressSample>,
    },
    Spo2 { samples: Vec<Spo2Sample> },
    Sleep { segments: Vec<SleepSegment> },
    Preference(PreferenceState),
    HrMeasurement(HrMeasurement),
    Spo2Measurement { status: u8 },
    /// The device reported it has nothing stored.
    NoData,
}

impl Decoded {
    /// Name of the variant, as used in the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Decoded::Battery(_) => "battery",
            Decoded::Acknowledged { .. } => "acknowledged",
            Decoded::ClockSet(_) => "clock_set",
            Decoded::Steps { .. } => "steps",
            Decoded::HeartRate { .. } => "heart_rate",
            Decoded::Stress { .. } => "stress",
            Decoded::Spo2 { .. } => "spo2",
            Decoded::Sleep { .. } => "sleep",
            Decoded::Preference(_) => "preference",
            Decoded::HrMeasurement(_) => "hr_measurement",
            Decoded::Spo2Measurement { .. } => "spo2_measurement",
            Decoded::NoData => "no_data",
        }
    }
}
