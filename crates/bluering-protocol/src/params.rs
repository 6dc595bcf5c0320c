//! Named string parameters supplied with a command.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ProtocolError, Result};

/// Command parameters, `name -> value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` arguments. A later duplicate key overrides.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| ProtocolError::invalid(arg, "expected key=value"))?;
            if key.is_empty() {
                return Err(ProtocolError::invalid(arg, "empty parameter name"));
            }
            params.insert(key, value);
        }
        Ok(params)
    }

    /// Builder form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fail on the first parameter name not in `known`.
    pub fn check_known(&self, known: &[&str]) -> Result<()> {
        match self.0.keys().find(|key| !known.contains(&key.as_str())) {
            Some(key) if known.is_empty() => Err(ProtocolError::invalid(
                key.as_str(),
                "command takes no parameters",
            )),
            Some(key) => Err(ProtocolError::invalid(
                key.as_str(),
                format!("unknown parameter, expected one of: {}", known.join(", ")),
            )),
            None => Ok(()),
        }
    }

    /// `yes` / `no` flag.
    pub fn yes_no(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some("yes") => Ok(Some(true)),
            Some("no") => Ok(Some(false)),
            Some(other) => Err(ProtocolError::invalid(
                key,
                format!("'{other}' is not yes or no"),
            )),
        }
    }

    /// Decimal integer within `range`.
    pub fn u8_in(&self, key: &str, range: RangeInclusive<u8>) -> Result<Option<u8>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let out_of_range = || {
            ProtocolError::invalid(
                key,
                format!(
                    "'{raw}' is not an integer in {}..={}",
                    range.start(),
                    range.end()
                ),
            )
        };
        let value: u8 = raw.parse().map_err(|_| out_of_range())?;
        if !range.contains(&value) {
            return Err(out_of_range());
        }
        Ok(Some(value))
    }

    /// One of a fixed set of names, mapped to its wire value.
    pub fn choice(&self, key: &str, choices: &[(&str, u8)]) -> Result<Option<u8>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        choices
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, wire)| Some(*wire))
            .ok_or_else(|| {
                let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
                ProtocolError::invalid(
                    key,
                    format!("'{raw}' is not one of: {}", names.join(", ")),
                )
            })
    }

    /// Calendar date, `YYYY-MM-DD`. A full ISO datetime is accepted and its
    /// date part used.
    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        parse_datetime(raw)
            .map(|dt| Some(dt.date()))
            .ok_or_else(|| ProtocolError::invalid(key, format!("'{raw}' is not a date")))
    }

    /// Wall-clock datetime, `YYYY-MM-DDTHH:MM[:SS]` (space separator also
    /// accepted). A bare date means midnight.
    pub fn datetime(&self, key: &str) -> Result<Option<NaiveDateTime>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        if let Some(dt) = parse_datetime(raw) {
            return Ok(Some(dt));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| Some(date.and_time(NaiveTime::MIN)))
            .map_err(|_| ProtocolError::invalid(key, format!("'{raw}' is not a datetime")))
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn reason(err: ProtocolError) -> (String, String) {
        match err {
            ProtocolError::InvalidParameter { name, reason } => (name, reason),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_key_value_pairs() {
        let params = Params::parse(["date=2024-10-22", "ago=3", "ago=4"]).unwrap();
        assert_eq!(params.get("date"), Some("2024-10-22"));
        assert_eq!(params.get("ago"), Some("4"));
        assert!(!params.contains("period"));
    }

    #[test]
    fn parse_rejects_missing_separator() {
        let (name, _) = reason(Params::parse(["enabled"]).unwrap_err());
        assert_eq!(name, "enabled");
    }

    #[test]
    fn unknown_names_are_rejected() {
        let params = Params::new().with("colour", "red");
        let (name, reason_text) = reason(params.check_known(&["enabled"]).unwrap_err());
        assert_eq!(name, "colour");
        assert!(reason_text.contains("enabled"));

        let (_, reason_text) = reason(params.check_known(&[]).unwrap_err());
        assert!(reason_text.contains("no parameters"));
    }

    #[test]
    fn yes_no_domain() {
        let params = Params::new().with("enabled", "maybe");
        assert!(params.yes_no("enabled").is_err());
        assert_eq!(
            Params::new().with("enabled", "no").yes_no("enabled").unwrap(),
            Some(false)
        );
        assert_eq!(Params::new().yes_no("enabled").unwrap(), None);
    }

    #[test]
    fn integer_range() {
        let params = Params::new().with("period", "0");
        assert!(params.u8_in("period", 1..=255).is_err());
        let params = Params::new().with("period", "300");
        assert!(params.u8_in("period", 1..=255).is_err());
        let params = Params::new().with("period", "-5");
        assert!(params.u8_in("period", 1..=255).is_err());
        let params = Params::new().with("period", "30");
        assert_eq!(params.u8_in("period", 1..=255).unwrap(), Some(30));
    }

    #[test]
    fn choice_maps_to_wire_value() {
        let choices = [("male", 0x00), ("female", 0x01), ("other", 0x02)];
        let params = Params::new().with("gender", "female");
        assert_eq!(params.choice("gender", &choices).unwrap(), Some(0x01));
        let params = Params::new().with("gender", "robot");
        let (name, reason_text) = reason(params.choice("gender", &choices).unwrap_err());
        assert_eq!(name, "gender");
        assert!(reason_text.contains("robot"));
    }

    #[test]
    fn dates_and_datetimes() {
        let params = Params::new()
            .with("date", "2024-10-22T08:00:00")
            .with("time", "2024-10-22 23:18:56")
            .with("day", "2024-02-30");
        assert_eq!(
            params.date("date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 22)
        );
        assert_eq!(
            params.datetime("time").unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 22).and_then(|d| d.and_hms_opt(23, 18, 56))
        );
        assert!(params.date("day").is_err());
    }

    proptest! {
        #[test]
        fn integer_accepted_only_inside_range(
            value in any::<u8>(),
            lo in any::<u8>(),
            span in any::<u8>(),
        ) {
            let hi = lo.saturating_add(span);
            let params = Params::new().with("period", value.to_string());
            let result = params.u8_in("period", lo..=hi);
            if (lo..=hi).contains(&value) {
                prop_assert_eq!(result.ok(), Some(Some(value)));
            } else {
                let (name, reason) = reason(result.unwrap_err());
                prop_assert_eq!(name, "period");
                let range = format!("{lo}..={hi}");
                prop_assert!(reason.contains(&range));
            }
        }

        #[test]
        fn wider_than_u8_is_rejected(value in 256u32..100_000) {
            let params = Params::new().with("age", value.to_string());
            prop_assert!(params.u8_in("age", 0..=u8::MAX).is_err());
        }
    }
}
