//! Protocol toolkit for BLE smart-ring health sensors.
//!
//! Two firmware generations are spoken: fixed 16-byte checksummed frames
//! (V1) and length-prefixed multi-notification responses (V2).
//!
//! # Crate Structure
//!
//! - [`transport`]: GATT profiles and the device link boundary
//! - [`frame`]: V1/V2 frame codecs and checksums
//! - [`protocol`]: command catalog, response sessions, payload decoders

/// Re-export transport types.
pub mod transport {
    pub use bluering_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use bluering_frame::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use bluering_protocol::*;
}
