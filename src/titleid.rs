use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, WadtikError};

/// Raw title ID as stored in a ticket.
///
/// The bytes are kept as-is, they also form the first half of the title key IV.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[repr(transparent)]
pub struct TitleId {
    raw: [u8; 8],
}

impl TitleId {
    pub fn to_bytes(self) -> [u8; 8] {
        self.raw
    }
    pub fn is_null(&self) -> bool {
        self.raw == [0; 8]
    }
    /// Upper half, the title type (`00000001` for system titles, `00010001` for channels...)
    pub fn high(&self) -> u32 {
        u32::from_be_bytes([self.raw[0], self.raw[1], self.raw[2], self.raw[3]])
    }
    /// Lower half, usually a four character game code
    pub fn low(&self) -> u32 {
        u32::from_be_bytes([self.raw[4], self.raw[5], self.raw[6], self.raw[7]])
    }
}

impl From<[u8; 8]> for TitleId {
    fn from(raw: [u8; 8]) -> Self {
        Self { raw }
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.raw))
    }
}

impl FromStr for TitleId {
    type Err = WadtikError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        let raw: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| WadtikError::InvalidLength {
                what: "title id",
                actual: bytes.len(),
                expected: 8,
            })?;
        Ok(Self { raw })
    }
}
