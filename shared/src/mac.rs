//! MAC address parsing

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// A 48-bit hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Check a string without keeping the parsed value
    pub fn is_valid(s: &str) -> bool {
        s.parse::<MacAddr>().is_ok()
    }
}

impl FromStr for MacAddr {
    type Err = ParseError;

    /// Six hex pairs joined by `:` or `-`. The same delimiter must be used
    /// throughout. Hex digits are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Mac(s.to_string());

        let bytes = s.as_bytes();
        if !s.is_ascii() || bytes.len() != 17 {
            return Err(invalid());
        }
        let delim = bytes[2];
        if delim != b':' && delim != b'-' {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            let start = i * 3;
            if i > 0 && bytes[start - 1] != delim {
                return Err(invalid());
            }
            let pair = &s[start..start + 2];
            if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }

        Ok(MacAddr(octets))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}
