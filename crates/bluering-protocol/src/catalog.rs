//! Static registry of every command the device understands.

use std::fmt;

use bluering_transport::Generation;

use crate::completion::Completion;
use crate::config::ProtocolConfig;
use crate::error::{ProtocolError, Result};
use crate::params::Params;
use crate::payload::{self, DecodeError, Response};
use crate::record::Decoded;

/// Builds the bytes that follow the opcode.
pub type EncodeFn = fn(&Params, &ProtocolConfig) -> Result<Vec<u8>>;

/// Turns a complete response into a typed result.
pub type DecodeFn = fn(&Response<'_>) -> std::result::Result<Decoded, DecodeError>;

/// Everything needed to run one command.
pub struct CommandSpec {
    pub name: &'static str,
    /// One-line description for listings.
    pub summary: &'static str,
    pub generation: Generation,
    pub opcode: u8,
    /// The response may span several frames.
    pub multi_frame: bool,
    /// Accepted parameter names.
    pub params: &'static [&'static str],
    pub completion: Completion,
    pub(crate) encode: EncodeFn,
    pub(crate) decode: DecodeFn,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("generation", &self.generation)
            .field("opcode", &format_args!("{:#04x}", self.opcode))
            .field("multi_frame", &self.multi_frame)
            .field("params", &self.params)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

const PREFERENCE_TOGGLE: &[&str] = &["enabled"];

pub static CATALOG: &[CommandSpec] = &[
    CommandSpec {
        name: "battery",
        summary: "Report battery charge percentage",
        generation: Generation::V1,
        opcode: 0x03,
        multi_frame: false,
        params: &[],
        completion: Completion::FirstFrame,
        encode: payload::no_payload,
        decode: payload::battery::decode,
    },
    CommandSpec {
        name: "blink",
        summary: "Blink twice",
        generation: Generation::V1,
        opcode: 0x10,
        multi_frame: false,
        params: &[],
        completion: Completion::FirstFrame,
        encode: payload::no_payload,
        decode: payload::acknowledge,
    },
    CommandSpec {
        name: "settime",
        summary: "Set the ring clock to the current (or given) wall-clock time",
        generation: Generation::V1,
        opcode: 0x01,
        multi_frame: true,
        params: &["time"],
        completion: Completion::OpcodeEcho,
        encode: payload::clock::encode,
        decode: payload::clock::decode,
    },
    CommandSpec {
        name: "actlog",
        summary: "Report step count, calorie and distance history",
        generation: Generation::V1,
        opcode: 0x43,
        multi_frame: true,
        params: &[],
        completion: Completion::ActivityLog,
        encode: payload::activity::encode,
        decode: payload::activity::decode,
    },
    CommandSpec {
        name: "hrlog",
        summary: "Report one day of heart-rate samples",
        generation: Generation::V1,
        opcode: 0x15,
        multi_frame: true,
        params: &["date"],
        completion: Completion::CountedLog,
        encode: payload::hr_log::encode,
        decode: payload::hr_log::decode,
    },
    CommandSpec {
        name: "stresslog",
        summary: "Report one day of stress samples",
        generation: Generation::V1,
        opcode: 0x37,
        multi_frame: true,
        params: &["ago"],
        completion: Completion::CountedLog,
        encode: payload::stress::encode,
        decode: payload::stress::decode,
    },
    CommandSpec {
        name: "hrpref",
        summary: "Report or change heart-rate logging and its period",
        generation: Generation::V1,
        opcode: 0x16,
        multi_frame: false,
        params: &["enabled", "period"],
        completion: Completion::FirstFrame,
        encode: payload::preference::encode_hr,
        decode: payload::preference::decode_hr,
    },
    CommandSpec {
        name: "spo2pref",
        summary: "Report or change SpO2 logging",
        generation: Generation::V1,
        opcode: 0x2C,
        multi_frame: false,
        params: PREFERENCE_TOGGLE,
        completion: Completion::FirstFrame,
        encode: payload::preference::encode_toggle,
        decode: payload::preference::decode_toggle,
    },
    CommandSpec {
        name: "stresspref",
        summary: "Report or change stress logging",
        generation: Generation::V1,
        opcode: 0x36,
        multi_frame: false,
        params: PREFERENCE_TOGGLE,
        completion: Completion::FirstFrame,
        encode: payload::preference::encode_toggle,
        decode: payload::preference::decode_toggle,
    },
    CommandSpec {
        name: "hrvpref",
        summary: "Report or change HRV logging",
        generation: Generation::V1,
        opcode: 0x38,
        multi_frame: false,
        params: PREFERENCE_TOGGLE,
        completion: Completion::FirstFrame,
        encode: payload::preference::encode_toggle,
        decode: payload::preference::decode_toggle,
    },
    CommandSpec {
        name: "userpref",
        summary: "Set user characteristics",
        generation: Generation::V1,
        opcode: 0x0A,
        multi_frame: false,
        params: &payload::profile::PARAMS,
        completion: Completion::FirstFrame,
        encode: payload::profile::encode,
        decode: payload::acknowledge,
    },
    CommandSpec {
        name: "measurehr",
        summary: "Measure heart rate now",
        generation: Generation::V1,
        opcode: 0x69,
        multi_frame: true,
        params: &[],
        completion: Completion::Measurement,
        encode: payload::measure::encode_hr,
        decode: payload::measure::decode_hr,
    },
    CommandSpec {
        name: "measurespo2",
        summary: "Trigger an SpO2 measurement into the log",
        generation: Generation::V1,
        opcode: 0x6A,
        multi_frame: false,
        params: &[],
        completion: Completion::FirstFrame,
        encode: payload::measure::encode_spo2,
        decode: payload::measure::decode_spo2,
    },
    CommandSpec {
        name: "spo2log",
        summary: "Report hourly SpO2 history",
        generation: Generation::V2,
        opcode: 0x2A,
        multi_frame: true,
        params: &[],
        completion: Completion::PayloadLength,
        encode: payload::spo2::encode,
        decode: payload::spo2::decode,
    },
    CommandSpec {
        name: "sleeplog",
        summary: "Report sleep history",
        generation: Generation::V2,
        opcode: 0x27,
        multi_frame: true,
        params: &[],
        completion: Completion::PayloadLength,
        encode: payload::spo2::encode,
        decode: payload::sleep::decode,
    },
];

/// Find a command by name.
pub fn lookup(name: &str) -> Result<&'static CommandSpec> {
    CATALOG
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| ProtocolError::UnknownCommand(name.to_string()))
}

/// Command names in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|spec| spec.name)
}
