use std::{borrow::Cow, fmt, str};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::WadtikError;

/// A wrapper over u8 array of a fixed size, used for NUL padded text fields such as the ticket
/// issuer
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[repr(transparent)]
pub struct SizedCString<const SIZE: usize>(
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))] [u8; SIZE],
);

impl<const SIZE: usize> SizedCString<SIZE> {
    /// Returns the text up to the first NUL byte, or str::Utf8Error if it's not valid UTF-8 data
    /// <https://doc.rust-lang.org/std/str/fn.from_utf8.html>
    pub fn as_str(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(self.trimmed())
    }
    /// Converts to a string, replacing invalid UTF-8 sequences with replacement character.
    /// Trailing NUL bytes are dropped.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.trimmed())
    }
    /// Checks if string inside this struct is all zeroes
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0)
    }
    /// Returns a reference to data stored inside, padding included
    #[must_use]
    pub fn data(&self) -> &[u8; SIZE] {
        &self.0
    }
    fn trimmed(&self) -> &[u8] {
        let end = self.0.iter().position(|v| *v == 0).unwrap_or(SIZE);
        &self.0[..end]
    }
}

impl<const SIZE: usize> Default for SizedCString<SIZE> {
    fn default() -> Self {
        Self([0u8; SIZE])
    }
}

impl<const SIZE: usize> From<[u8; SIZE]> for SizedCString<SIZE> {
    fn from(other: [u8; SIZE]) -> SizedCString<SIZE> {
        SizedCString(other)
    }
}

impl<const SIZE: usize> TryFrom<&str> for SizedCString<SIZE> {
    type Error = WadtikError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.len() > SIZE {
            return Err(WadtikError::StringTooLong {
                actual: value.len(),
                capacity: SIZE,
            });
        }
        let mut data = [0u8; SIZE];
        data[..value.len()].copy_from_slice(value.as_bytes());
        Ok(Self(data))
    }
}

impl<const SIZE: usize> fmt::Debug for SizedCString<SIZE> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_fmt(format_args!("\"{}\"", self.to_string_lossy()))
    }
}
