use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Default time to wait for a complete response.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// How frame validation problems are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Log problems and keep using the frame, as the device expects.
    #[default]
    Lenient,
    /// Fail the command on the first length, opcode or checksum problem.
    Strict,
}

/// Time zone the device clock and decoded timestamps are expressed in.
///
/// The device keeps wall-clock time, not UTC: whatever zone is chosen, the
/// clock is set to that zone's wall-clock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

impl TimeZoneMode {
    /// Current wall-clock time.
    pub fn now(self) -> NaiveDateTime {
        match self {
            TimeZoneMode::Local => Local::now().naive_local(),
            TimeZoneMode::Utc => Utc::now().naive_utc(),
        }
    }

    /// Current date.
    pub fn today(self) -> NaiveDate {
        self.now().date()
    }

    /// Unix timestamp of a wall-clock time, `None` if it does not exist in
    /// the zone (DST gap). Ambiguous times resolve to the earlier instant.
    pub fn timestamp_of(self, wall: NaiveDateTime) -> Option<i64> {
        match self {
            TimeZoneMode::Local => Local
                .from_local_datetime(&wall)
                .earliest()
                .map(|dt| dt.timestamp()),
            TimeZoneMode::Utc => Some(Utc.from_utc_datetime(&wall).timestamp()),
        }
    }

    /// Wall-clock time of a unix timestamp.
    pub fn wall_clock(self, timestamp: i64) -> Option<NaiveDateTime> {
        match self {
            TimeZoneMode::Local => Local
                .timestamp_opt(timestamp, 0)
                .single()
                .map(|dt| dt.naive_local()),
            TimeZoneMode::Utc => DateTime::from_timestamp(timestamp, 0).map(|dt| dt.naive_utc()),
        }
    }
}

/// Protocol-layer configuration, passed explicitly to commands and sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Frame validation policy.
    pub validation: Validation,
    /// Zone for clock setting and timestamp decoding.
    pub time_zone: TimeZoneMode,
    /// Log every received frame at debug level.
    pub trace_frames: bool,
    /// Upper bound on waiting for a response.
    pub response_timeout: Duration,
    /// Pin "today" for date-relative decoding. `None` uses the current date.
    pub today: Option<NaiveDate>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            validation: Validation::Lenient,
            time_zone: TimeZoneMode::Local,
            trace_frames: false,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            today: None,
        }
    }
}

impl ProtocolConfig {
    /// Reference date for "days ago" style fields.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| self.time_zone.today())
    }

    pub fn is_strict(&self) -> bool {
        self.validation == Validation::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_round_trip() {
        let wall = NaiveDate::from_ymd_opt(2024, 10, 22)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts = TimeZoneMode::Utc.timestamp_of(wall).unwrap();
        assert_eq!(ts, 1_729_555_200);
        assert_eq!(TimeZoneMode::Utc.wall_clock(ts), Some(wall));
    }

    #[test]
    fn pinned_today_wins() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let config = ProtocolConfig {
            today: Some(day),
            ..ProtocolConfig::default()
        };
        assert_eq!(config.today(), day);
        assert!(!config.is_strict());
    }
}
