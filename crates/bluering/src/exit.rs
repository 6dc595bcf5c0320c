use std::fmt;
use std::io;

use bluering_protocol::ProtocolError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn protocol_error(context: &str, err: ProtocolError) -> CliError {
    let code = match &err {
        ProtocolError::Transport(_) => TRANSPORT_ERROR,
        ProtocolError::UnknownCommand(_) | ProtocolError::InvalidParameter { .. } => USAGE,
        ProtocolError::Frame(_) | ProtocolError::Decode { .. } => DATA_INVALID,
        ProtocolError::Timeout(_) => TIMEOUT,
        ProtocolError::Incomplete { .. }
        | ProtocolError::Cancelled
        | ProtocolError::Disconnected => FAILURE,
    };
    let message = match &err {
        ProtocolError::Decode { raw, .. } if !raw.is_empty() => {
            format!("{context}: {err} (raw {})", hex::encode(raw))
        }
        _ => format!("{context}: {err}"),
    };
    CliError::new(code, message)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parameter_errors_are_usage() {
        let err = ProtocolError::InvalidParameter {
            name: "gender".into(),
            reason: "'robot' is not one of: male, female, other".into(),
        };
        let cli = protocol_error("encode userpref", err);
        assert_eq!(cli.code, USAGE);
        assert!(cli.message.starts_with("encode userpref: "));
    }

    #[test]
    fn timeout_maps_to_124() {
        let cli = protocol_error("wait", ProtocolError::Timeout(Duration::from_secs(30)));
        assert_eq!(cli.code, TIMEOUT);
    }

    #[test]
    fn missing_file_is_usage() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(io_error("read capture", err).code, USAGE);
    }
}
