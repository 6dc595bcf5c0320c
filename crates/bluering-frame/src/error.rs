/// Problems found while encoding or validating frames.
///
/// Most of these are observations rather than hard failures: the device is
/// known to send frames that violate them, and the session decides whether
/// to log or escalate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// A V1 frame is not exactly 16 bytes long.
    #[error("frame has wrong length ({actual} bytes, expected {expected})")]
    Length { expected: usize, actual: usize },

    /// The response opcode (acknowledgment bit masked) does not match.
    #[error("opcode mismatch (expected {expected:#04x}, got {actual:#04x})")]
    OpcodeMismatch { expected: u8, actual: u8 },

    /// The trailing checksum byte does not match the byte sum.
    #[error("checksum mismatch (computed {expected:#04x}, frame carries {actual:#04x})")]
    Checksum { expected: u8, actual: u8 },

    /// The command payload does not fit the frame.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A V2 response started with fewer bytes than its header.
    #[error("frame too short ({len} bytes, need at least {min})")]
    TooShort { len: usize, min: usize },

    /// A V2 response did not start with the sync byte.
    #[error("unexpected frame tag {0:#04x} (expected 0xbc)")]
    BadSync(u8),

    /// A multi-frame response skipped or repeated a sequence number.
    #[error("sequence mismatch (expected {expected}, got {actual})")]
    SequenceMismatch { expected: usize, actual: u8 },

    /// A fixed marker byte did not have its expected value.
    #[error("unexpected marker byte {actual:#04x} (expected {expected:#04x})")]
    UnexpectedMarker { expected: u8, actual: u8 },

    /// A data frame disagrees with the frame count announced up front.
    #[error("frame count mismatch (announced {expected}, frame says {actual})")]
    FrameCountMismatch { expected: u8, actual: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
