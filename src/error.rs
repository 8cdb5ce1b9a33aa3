use core::fmt;

use crate::crypto::CipherError;

/// Catch-all error type for the wadtik library
#[non_exhaustive]
#[derive(Debug)]
pub enum WadtikError {
    /// A read of `what` needed the buffer to reach `expected` bytes, but it only had `actual`
    TruncatedInput {
        what: &'static str,
        actual: usize,
        expected: usize,
    },
    CryptoFailure(CipherError),
    InvalidLength {
        what: &'static str,
        actual: usize,
        expected: usize,
    },
    StringTooLong {
        actual: usize,
        capacity: usize,
    },
    Hex(hex::FromHexError),
}

impl fmt::Display for WadtikError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedInput { what, actual, expected } => write!(
                f,
                "Truncated input while reading {what}: {actual} bytes available, {expected} needed"
            ),
            Self::CryptoFailure(err) => write!(f, "Title key transform failed: {err}"),
            Self::InvalidLength { what, actual, expected } => {
                write!(f, "Invalid length of {what}: {actual} (expected {expected})")
            }
            Self::StringTooLong { actual, capacity } => {
                write!(f, "String of {actual} bytes does not fit into {capacity} bytes")
            }
            Self::Hex(_) => f.write_str("Failed to decode hex string"),
        }
    }
}

impl std::error::Error for WadtikError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CryptoFailure(err) => Some(err),
            Self::Hex(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CipherError> for WadtikError {
    fn from(err: CipherError) -> Self {
        Self::CryptoFailure(err)
    }
}

impl From<hex::FromHexError> for WadtikError {
    fn from(err: hex::FromHexError) -> Self {
        Self::Hex(err)
    }
}
