use bluering_frame::codec_for;
use bluering_transport::Generation;
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::catalog::{lookup, CommandSpec};
use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;
use crate::session::CommandSession;

/// A resolved command with its parameters and outbound frame.
///
/// Parameters are validated and the frame is built at construction, so an
/// invalid parameter fails before any byte could reach the device.
#[derive(Debug, Clone)]
pub struct Command {
    spec: &'static CommandSpec,
    params: Params,
    payload: Bytes,
    frame: Bytes,
}

impl Command {
    /// Resolve `name` in the catalog and build its frame.
    pub fn new(name: &str, params: Params, config: &ProtocolConfig) -> Result<Self> {
        Self::from_spec(lookup(name)?, params, config)
    }

    pub fn from_spec(
        spec: &'static CommandSpec,
        params: Params,
        config: &ProtocolConfig,
    ) -> Result<Self> {
        params.check_known(spec.params)?;
        let payload = Bytes::from((spec.encode)(&params, config)?);

        let mut frame = BytesMut::new();
        codec_for(spec.generation, spec.opcode).encode(&payload, &mut frame)?;
        let frame = frame.freeze();
        debug!(
            command = spec.name,
            opcode = spec.opcode,
            frame = %hex::encode(&frame),
            "built command"
        );
        Ok(Self {
            spec,
            params,
            payload,
            frame,
        })
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn spec(&self) -> &'static CommandSpec {
        self.spec
    }

    pub fn generation(&self) -> Generation {
        self.spec.generation
    }

    pub fn opcode(&self) -> u8 {
        self.spec.opcode
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Bytes following the opcode, before framing.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Complete outbound frame.
    pub fn frame(&self) -> &Bytes {
        &self.frame
    }

    /// Start accumulating the response to this command.
    pub fn session(&self, config: ProtocolConfig) -> CommandSession {
        CommandSession::new(self, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;

    #[test]
    fn battery_frame() {
        let command = Command::new("battery", Params::new(), &ProtocolConfig::default()).unwrap();
        let mut expected = [0u8; 16];
        expected[0] = 0x03;
        expected[15] = 0x03;
        assert_eq!(command.frame().as_ref(), expected);
        assert!(command.payload().is_empty());
    }

    #[test]
    fn settime_frame_matches_vendor_capture() {
        let params = Params::new().with("time", "2024-10-22T23:18:56");
        let command = Command::new("settime", params, &ProtocolConfig::default()).unwrap();
        assert_eq!(
            hex::encode(command.frame()),
            "012410222318560100000000000000e9"
        );
    }

    #[test]
    fn sleeplog_frame() {
        let command = Command::new("sleeplog", Params::new(), &ProtocolConfig::default()).unwrap();
        assert_eq!(hex::encode(command.frame()), "bc270100ff00ffe2");
        assert_eq!(command.generation(), Generation::V2);
    }

    #[test]
    fn measurespo2_frame() {
        let command =
            Command::new("measurespo2", Params::new(), &ProtocolConfig::default()).unwrap();
        assert_eq!(&command.frame()[..4], &[0x6A, 0x6A, 0x03, 0x32]);
    }

    #[test]
    fn unknown_parameter_fails_before_encoding() {
        let params = Params::new().with("colour", "red");
        let err = Command::new("battery", params, &ProtocolConfig::default()).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidParameter { name, .. } if name == "colour"));
    }

    #[test]
    fn userpref_gender_robot() {
        let params = Params::new().with("gender", "robot");
        let err = Command::new("userpref", params, &ProtocolConfig::default()).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidParameter { name, .. } if name == "gender"));
    }

    #[test]
    fn unknown_command() {
        let err = Command::new("reboot", Params::new(), &ProtocolConfig::default()).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownCommand(_)));
    }
}
