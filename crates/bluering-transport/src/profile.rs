//! Protocol generations and the GATT channel pair each one talks over.
//!
//! Generation 1 firmware exposes a Nordic-style UART service; generation 2
//! firmware moved to a vendor service. Session setup must pick the profile
//! matching the command generation before any frame is written.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{Result, TransportError};

/// Service UUID carried in advertisements only. It never shows up after
/// service discovery, but it identifies the device while scanning.
pub const ADVERTISED_SERVICE: &str = "00003802-0000-1000-8000-00805f9b34fb";

/// On-the-wire protocol generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    /// Fixed 16-byte frames.
    V1,
    /// Variable-length, length-prefixed frames.
    V2,
}

impl Generation {
    /// Short lowercase name (`v1`, `v2`).
    pub fn as_str(self) -> &'static str {
        match self {
            Generation::V1 => "v1",
            Generation::V2 => "v2",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UUIDs of the service and its command/notification characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceProfile {
    /// Primary service UUID.
    pub service: &'static str,
    /// Characteristic commands are written to (write without response).
    pub write: &'static str,
    /// Characteristic responses are notified on.
    pub notify: &'static str,
}

impl ServiceProfile {
    pub const V1: ServiceProfile = ServiceProfile {
        service: "6e40fff0-b5a3-f393-e0a9-e50e24dcca9e",
        write: "6e400002-b5a3-f393-e0a9-e50e24dcca9e",
        notify: "6e400003-b5a3-f393-e0a9-e50e24dcca9e",
    };

    pub const V2: ServiceProfile = ServiceProfile {
        service: "de5bf728-d711-4e47-af26-65e3012a5dc7",
        write: "de5bf72a-d711-4e47-af26-65e3012a5dc7",
        notify: "de5bf729-d711-4e47-af26-65e3012a5dc7",
    };

    /// Profile used by the given generation.
    pub fn for_generation(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Self::V1,
            Generation::V2 => Self::V2,
        }
    }

    /// Check a discovered GATT table (service UUID -> characteristic UUIDs).
    ///
    /// Fails with [`TransportError::Unavailable`] when the service or either
    /// characteristic is missing. UUID comparison ignores ASCII case.
    pub fn verify(&self, discovered: &HashMap<String, Vec<String>>) -> Result<()> {
        let characteristics = discovered
            .iter()
            .find(|(uuid, _)| uuid.eq_ignore_ascii_case(self.service))
            .map(|(_, chars)| chars)
            .ok_or_else(|| TransportError::Unavailable {
                what: format!("service {}", self.service),
            })?;

        for wanted in [self.write, self.notify] {
            if !characteristics
                .iter()
                .any(|uuid| uuid.eq_ignore_ascii_case(wanted))
            {
                return Err(TransportError::Unavailable {
                    what: format!("characteristic {wanted}"),
                });
            }
        }

        debug!(service = self.service, "service profile verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(service: &str, chars: &[&str]) -> HashMap<String, Vec<String>> {
        let mut map = HashMap::new();
        map.insert(
            service.to_string(),
            chars.iter().map(|c| c.to_string()).collect(),
        );
        map
    }

    #[test]
    fn verify_accepts_complete_profile() {
        let p = ServiceProfile::V1;
        let discovered = table(p.service, &[p.write, p.notify]);
        assert!(p.verify(&discovered).is_ok());
    }

    #[test]
    fn verify_ignores_uuid_case() {
        let p = ServiceProfile::V2;
        let discovered = table(
            &p.service.to_uppercase(),
            &[&p.write.to_uppercase(), &p.notify.to_uppercase()],
        );
        assert!(p.verify(&discovered).is_ok());
    }

    #[test]
    fn verify_rejects_missing_service() {
        let discovered = table(ServiceProfile::V1.service, &[]);
        let err = ServiceProfile::V2.verify(&discovered).unwrap_err();
        assert!(matches!(err, TransportError::Unavailable { .. }));
    }

    #[test]
    fn verify_rejects_missing_characteristic() {
        let p = ServiceProfile::V1;
        let discovered = table(p.service, &[p.write]);
        let err = p.verify(&discovered).unwrap_err();
        match err {
            TransportError::Unavailable { what } => assert!(what.contains(p.notify)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn profile_per_generation() {
        assert_eq!(ServiceProfile::for_generation(Generation::V1), ServiceProfile::V1);
        assert_eq!(ServiceProfile::for_generation(Generation::V2), ServiceProfile::V2);
        assert_eq!(Generation::V2.to_string(), "v2");
    }
}
