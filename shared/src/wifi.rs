//! Wi-Fi parameter types
//!
//! Discriminants match the values the co-processor firmware expects on the
//! control link.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// Operating mode of the co-processor's Wi-Fi radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WifiMode {
    #[default]
    None = 0,
    Station = 1,
    SoftAp = 2,
    StationSoftAp = 3,
}

impl FromStr for WifiMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(WifiMode::None),
            "station" => Ok(WifiMode::Station),
            "softap" => Ok(WifiMode::SoftAp),
            "station+softap" => Ok(WifiMode::StationSoftAp),
            other => Err(ParseError::WifiMode(other.to_string())),
        }
    }
}

impl fmt::Display for WifiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WifiMode::None => write!(f, "none"),
            WifiMode::Station => write!(f, "station"),
            WifiMode::SoftAp => write!(f, "softap"),
            WifiMode::StationSoftAp => write!(f, "station+softap"),
        }
    }
}

/// Interface a MAC address operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacMode {
    Station,
    SoftAp,
}

impl FromStr for MacMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "station" => Ok(MacMode::Station),
            "softap" => Ok(MacMode::SoftAp),
            other => Err(ParseError::MacMode(other.to_string())),
        }
    }
}

impl fmt::Display for MacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacMode::Station => write!(f, "station"),
            MacMode::SoftAp => write!(f, "softap"),
        }
    }
}

/// Band selection used when connecting or starting the soft-AP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandMode {
    /// Only look on 2.4GHz
    TwoGhzOnly = 1,
    /// Only look on 5GHz
    FiveGhzOnly = 2,
    /// 2.4GHz first, then 5GHz
    Auto = 3,
}

impl BandMode {
    pub const MIN: i64 = BandMode::TwoGhzOnly as i64;
    pub const MAX: i64 = BandMode::Auto as i64;
}

impl TryFrom<i64> for BandMode {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BandMode::TwoGhzOnly),
            2 => Ok(BandMode::FiveGhzOnly),
            3 => Ok(BandMode::Auto),
            other => Err(ParseError::BandMode(other)),
        }
    }
}

/// Soft-AP security protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Open = 0,
    WpaPsk = 2,
    Wpa2Psk = 3,
    WpaWpa2Psk = 4,
}

impl AuthMode {
    pub fn is_open(self) -> bool {
        self == AuthMode::Open
    }
}

impl FromStr for AuthMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(AuthMode::Open),
            "wpa_psk" => Ok(AuthMode::WpaPsk),
            "wpa2_psk" => Ok(AuthMode::Wpa2Psk),
            "wpa_wpa2_psk" => Ok(AuthMode::WpaWpa2Psk),
            other => Err(ParseError::AuthMode(other.to_string())),
        }
    }
}

/// Soft-AP channel width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bandwidth {
    Ht20 = 1,
    Ht40 = 2,
}

impl Bandwidth {
    pub fn mhz(self) -> i64 {
        match self {
            Bandwidth::Ht20 => 20,
            Bandwidth::Ht40 => 40,
        }
    }
}

impl TryFrom<i64> for Bandwidth {
    type Error = ParseError;

    /// Takes the width in MHz
    fn try_from(mhz: i64) -> Result<Self, Self::Error> {
        match mhz {
            20 => Ok(Bandwidth::Ht20),
            40 => Ok(Bandwidth::Ht40),
            other => Err(ParseError::Bandwidth(other)),
        }
    }
}

/// Wi-Fi modem power saving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSaveMode {
    Min = 1,
    Max = 2,
}

impl FromStr for PowerSaveMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(PowerSaveMode::Min),
            "max" => Ok(PowerSaveMode::Max),
            other => Err(ParseError::PowerSave(other.to_string())),
        }
    }
}

impl fmt::Display for PowerSaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerSaveMode::Min => write!(f, "min"),
            PowerSaveMode::Max => write!(f, "max"),
        }
    }
}
