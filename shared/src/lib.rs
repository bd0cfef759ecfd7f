//! ESP-Hosted Shared Parameter Types
//!
//! This crate provides the parameter vocabulary understood by the host control
//! utility: Wi-Fi modes, MAC addresses, radio settings and event names, together
//! with the numeric limits enforced before a request reaches the co-processor.

pub mod event;
pub mod mac;
pub mod wifi;

use thiserror::Error;

pub use event::{Event, EventSelector};
pub use mac::MacAddr;
pub use wifi::{AuthMode, BandMode, Bandwidth, MacMode, PowerSaveMode, WifiMode};

/// Errors produced while parsing a user-supplied parameter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid mode")]
    WifiMode(String),

    #[error("Incorrect Wi-Fi mode")]
    MacMode(String),

    #[error("Invalid MAC {0}")]
    Mac(String),

    #[error("Invalid band_mode parameter {0}")]
    BandMode(i64),

    #[error("Unsupported sec prot {0}")]
    AuthMode(String),

    #[error("Unsupported bandwidth {0}")]
    Bandwidth(i64),

    #[error("Unsupported power save mode {0}")]
    PowerSave(String),

    #[error("Unsupported event {0}")]
    Event(String),
}

/// Numeric limits checked before a request is forwarded
pub mod limits {
    use std::ops::RangeInclusive;

    /// Soft-AP client limit supported by the hardware
    pub const SOFTAP_MAX_CONN: RangeInclusive<i64> = 1..=10;

    /// Accepted heartbeat interval when enabling, in seconds
    pub const HEARTBEAT_DURATION_SECS: RangeInclusive<i64> = 10..=3600;

    /// Heartbeat interval used when the caller does not give one
    pub const DEFAULT_HEARTBEAT_DURATION_SECS: i64 = 30;
}

/// Defaults applied when a request leaves an optional parameter out
pub mod defaults {
    use crate::{BandMode, Bandwidth};

    pub const STATION_LISTEN_INTERVAL: i64 = 3;
    pub const STATION_BAND_MODE: BandMode = BandMode::Auto;

    pub const SOFTAP_CHANNEL: i64 = 1;
    pub const SOFTAP_MAX_CONN: i64 = 4;
    pub const SOFTAP_BANDWIDTH: Bandwidth = Bandwidth::Ht40;
    pub const SOFTAP_BAND_MODE: BandMode = BandMode::Auto;

    pub const WIFI_MAX_TX_POWER: i64 = 20;

    /// Three octets; "01" is the world-safe regulatory domain
    pub const COUNTRY_CODE: &str = "01 ";
}

/// Loose boolean value as typed by a user or passed by a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolInput<'a> {
    Native(bool),
    Text(&'a str),
}

/// Tri-state boolean coercion.
///
/// `y`, `yes` and `1` map to true; `n`, `no` and `0` to false. Matching is
/// case-sensitive. Anything else is `None` and must be treated as invalid.
pub fn parse_bool(input: BoolInput<'_>) -> Option<bool> {
    match input {
        BoolInput::Native(b) => Some(b),
        BoolInput::Text("y" | "yes" | "1") => Some(true),
        BoolInput::Text("n" | "no" | "0") => Some(false),
        BoolInput::Text(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_documented_spellings() {
        for s in ["y", "yes", "1"] {
            assert_eq!(parse_bool(BoolInput::Text(s)), Some(true), "{s}");
        }
        for s in ["n", "no", "0"] {
            assert_eq!(parse_bool(BoolInput::Text(s)), Some(false), "{s}");
        }
        assert_eq!(parse_bool(BoolInput::Native(true)), Some(true));
        assert_eq!(parse_bool(BoolInput::Native(false)), Some(false));
    }

    #[test]
    fn test_parse_bool_is_case_sensitive() {
        assert_eq!(parse_bool(BoolInput::Text("YES")), None);
        assert_eq!(parse_bool(BoolInput::Text("N")), None);
        assert_eq!(parse_bool(BoolInput::Text("maybe")), None);
        assert_eq!(parse_bool(BoolInput::Text("")), None);
    }

    #[test]
    fn test_limits() {
        assert!(!limits::SOFTAP_MAX_CONN.contains(&0));
        assert!(limits::SOFTAP_MAX_CONN.contains(&1));
        assert!(limits::SOFTAP_MAX_CONN.contains(&10));
        assert!(!limits::SOFTAP_MAX_CONN.contains(&11));
        assert!(limits::HEARTBEAT_DURATION_SECS.contains(&3600));
        assert!(!limits::HEARTBEAT_DURATION_SECS.contains(&3601));
    }
}
