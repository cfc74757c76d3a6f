//! S-register parameter registry for SiK radios.
//!
//! The radio exposes its configuration as numbered S-registers (`ATS<n>?` /
//! `ATS<n>=<v>`). This crate is the single source of truth for the mapping
//! between human-readable parameter names and register indices, the valid
//! range and default of every register, and which parameters must hold the
//! same value on both radios of a link.
//!
//! The table is fixed at compile time and matches the RFD900 datasheet.

mod registers;

pub use registers::SRegister;

use thiserror::Error;

/// Errors from client-side parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// The name does not match any registered parameter.
    #[error("unknown parameter: {0}")]
    NotFound(String),

    /// The value falls outside the parameter's valid range.
    #[error("{name} value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

/// Definition of one configurable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDef {
    /// The S-register backing this parameter.
    pub register: SRegister,
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
    /// Factory default, within `[min, max]`.
    pub default: i64,
    /// Datasheet description.
    pub description: &'static str,
    /// Whether both radios of a link must share the value.
    pub requires_matching: bool,
}

impl ParamDef {
    /// The parameter name (the S-register's symbolic name).
    pub fn name(&self) -> &'static str {
        self.register.name()
    }

    /// Check a candidate value against the bounds.
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

const fn def(
    register: SRegister,
    min: i64,
    max: i64,
    default: i64,
    description: &'static str,
    requires_matching: bool,
) -> ParamDef {
    ParamDef {
        register,
        min,
        max,
        default,
        description,
        requires_matching,
    }
}

/// Every configurable parameter, in register order. Register order is also
/// the display order for parameter listings.
///
/// Bounds and defaults are from the RFD900 datasheet.
pub const DEFINITIONS: [ParamDef; 19] = [
    def(SRegister::Format, 0, 0, 0, "EEPROM version (should not be changed)", false),
    def(SRegister::SerialSpeed, 2, 115, 57, "Serial speed (2=2400 ... 115=115200)", false),
    def(SRegister::AirSpeed, 2, 250, 64, "Air data rate (2-250 kbps)", true),
    def(SRegister::NetId, 0, 499, 25, "Network ID", true),
    def(SRegister::TxPower, 0, 30, 20, "Transmit power in dBm", false),
    def(SRegister::Ecc, 0, 1, 1, "Error correcting code (0=disabled, 1=enabled)", true),
    def(SRegister::Mavlink, 0, 1, 1, "MAVLink framing (0=disabled, 1=enabled)", false),
    def(SRegister::OpResend, 0, 1, 1, "Opportunistic resend (0=disabled, 1=enabled)", false),
    def(SRegister::MinFreq, 902_000, 927_000, 915_000, "Min frequency in KHz", true),
    def(SRegister::MaxFreq, 903_000, 928_000, 928_000, "Max frequency in KHz", true),
    def(SRegister::NumChannels, 5, 50, 50, "Number of frequency hopping channels", true),
    def(SRegister::DutyCycle, 10, 100, 100, "Transmit duty cycle %", false),
    def(SRegister::LbtRssi, 0, 1, 0, "Listen before talk threshold (do not change)", true),
    def(SRegister::Manchester, 0, 1, 0, "Manchester encoding (do not change)", true),
    def(SRegister::RtsCts, 0, 1, 0, "RTS/CTS flow control (do not change)", false),
    def(SRegister::NodeId, 0, 29, 2, "Node ID (0=base node)", false),
    def(SRegister::NodeDestination, 0, 65_535, 65_535, "Remote node ID (65535=broadcast)", false),
    def(SRegister::SyncAny, 0, 1, 0, "Allow sending without base node sync", false),
    def(SRegister::NodeCount, 2, 30, 3, "Total number of nodes in network", true),
];

/// Look up a parameter definition by name (case-insensitive).
pub fn lookup(name: &str) -> Option<&'static ParamDef> {
    let register = SRegister::from_name(name)?;
    DEFINITIONS.iter().find(|d| d.register == register)
}

/// Validate a `(name, value)` pair before it touches the wire.
///
/// The radio enforces ranges itself and answers `ERROR` for a bad write,
/// but checking here avoids the round-trip and gives a precise message.
pub fn validate(name: &str, value: i64) -> Result<&'static ParamDef, ValidateError> {
    let def = lookup(name).ok_or_else(|| ValidateError::NotFound(name.to_string()))?;
    if !def.contains(value) {
        return Err(ValidateError::OutOfRange {
            name: def.name(),
            value,
            min: def.min,
            max: def.max,
        });
    }
    Ok(def)
}

/// Iterate all parameter definitions in display order.
pub fn iter() -> impl Iterator<Item = &'static ParamDef> {
    DEFINITIONS.iter()
}

/// Names of the parameters that must match on both radios of a link.
///
/// Exposed for link-consistency tooling; this crate does not itself check
/// anything across radios.
pub fn matching_required() -> impl Iterator<Item = &'static str> {
    DEFINITIONS
        .iter()
        .filter(|d| d.requires_matching)
        .map(|d| d.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_bounds() {
        for def in iter() {
            assert!(
                def.min <= def.default && def.default <= def.max,
                "{}: default {} outside [{}, {}]",
                def.name(),
                def.default,
                def.min,
                def.max
            );
        }
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DEFINITIONS.len());
    }

    #[test]
    fn test_table_in_register_order() {
        let indices: Vec<u8> = iter().map(|d| d.register.index()).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_every_register_has_a_definition() {
        for register in SRegister::ALL {
            assert!(
                lookup(register.name()).is_some(),
                "no definition for {}",
                register.name()
            );
        }
    }

    #[test]
    fn test_lookup_known_parameter() {
        let def = lookup("NETID").unwrap();
        assert_eq!(def.register.index(), 3);
        assert_eq!(def.min, 0);
        assert_eq!(def.max, 499);
        assert_eq!(def.default, 25);
        assert!(def.requires_matching);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("netid"), lookup("NETID"));
        assert!(lookup("netid").is_some());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("BOGUS").is_none());
    }

    #[test]
    fn test_validate_in_range() {
        assert!(validate("NETID", 0).is_ok());
        assert!(validate("NETID", 100).is_ok());
        assert!(validate("NETID", 499).is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        let err = validate("NETID", 500).unwrap_err();
        assert_eq!(
            err,
            ValidateError::OutOfRange {
                name: "NETID",
                value: 500,
                min: 0,
                max: 499,
            }
        );
        assert!(validate("NETID", -1).is_err());
    }

    #[test]
    fn test_validate_unknown_regardless_of_value() {
        assert_eq!(
            validate("BOGUS", 0).unwrap_err(),
            ValidateError::NotFound("BOGUS".to_string())
        );
        assert!(validate("BOGUS", 1_000_000).is_err());
    }

    #[test]
    fn test_matching_required_set() {
        let matching: Vec<_> = matching_required().collect();
        assert!(matching.contains(&"NETID"));
        assert!(matching.contains(&"AIR_SPEED"));
        assert!(matching.contains(&"MIN_FREQ"));
        assert!(!matching.contains(&"TXPOWER"));
        assert_eq!(matching.len(), 9);
    }
}
