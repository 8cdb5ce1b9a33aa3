//! Title key transform.
//!
//! The title key stored in a ticket is encrypted with AES-128-CBC. The key is one of three fixed
//! common keys picked by the ticket's key type, and the IV is the title ID followed by eight zero
//! bytes.

use std::fmt;

use hex_literal::hex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::titleid::TitleId;

pub mod aes128_cbc {
    pub use aes::cipher::block_padding::{NoPadding, Pkcs7};
    pub use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
    pub type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
    pub type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
}

use aes128_cbc::*;

/// Wii common key, key type 0
pub const COMMON_KEY: [u8; 0x10] = hex!("ebe42a225e8593e448d9c5457381aaf7");
/// Korean Wii common key, key type 1
pub const KOREAN_KEY: [u8; 0x10] = hex!("63b82bb4f4614e2e13f2fefbba4c9b7e");
/// vWii common key used by Wii U in Wii mode, key type 2
pub const VWII_KEY: [u8; 0x10] = hex!("30bfc76e7c19afbb23163330ced7c28d");

/// Selects which common key encrypts the title key
#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyType {
    #[default]
    Common,
    Korean,
    VWii,
    /// Any other byte. Encrypted with the common key, the raw value is kept so it survives
    /// re-encoding.
    Unknown(u8),
}

impl KeyType {
    /// Common key this key type maps to
    pub fn key(self) -> &'static [u8; 0x10] {
        select_key(self)
    }
}

impl From<u8> for KeyType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Common,
            1 => Self::Korean,
            2 => Self::VWii,
            other => Self::Unknown(other),
        }
    }
}

impl From<KeyType> for u8 {
    fn from(ty: KeyType) -> u8 {
        match ty {
            KeyType::Common => 0,
            KeyType::Korean => 1,
            KeyType::VWii => 2,
            KeyType::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Common => f.write_str("common"),
            Self::Korean => f.write_str("korean"),
            Self::VWii => f.write_str("vwii"),
            Self::Unknown(raw) => write!(f, "unknown(0x{raw:02x})"),
        }
    }
}

/// Error reported by the cipher while transforming a title key
#[derive(Debug)]
pub enum CipherError {
    InvalidLength(aes::cipher::InvalidLength),
    Unpad(aes::cipher::block_padding::UnpadError),
    /// Encryption produced less than one block, so there is nothing to truncate to
    ShortOutput(usize),
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidLength(err) => write!(f, "invalid key or IV length: {err}"),
            Self::Unpad(err) => write!(f, "decryption failed: {err}"),
            Self::ShortOutput(len) => write!(f, "cipher output is {len} bytes, expected at least 16"),
        }
    }
}

impl std::error::Error for CipherError {}

impl From<aes::cipher::InvalidLength> for CipherError {
    fn from(err: aes::cipher::InvalidLength) -> Self {
        Self::InvalidLength(err)
    }
}

impl From<aes::cipher::block_padding::UnpadError> for CipherError {
    fn from(err: aes::cipher::block_padding::UnpadError) -> Self {
        Self::Unpad(err)
    }
}

/// Returns the common key for a key type, unknown key types fall back to [`COMMON_KEY`]
pub fn select_key(ty: KeyType) -> &'static [u8; 0x10] {
    match ty {
        KeyType::Common => &COMMON_KEY,
        KeyType::Korean => &KOREAN_KEY,
        KeyType::VWii => &VWII_KEY,
        KeyType::Unknown(raw) => {
            log::debug!("key type 0x{raw:02x} is not known, using the common key");
            &COMMON_KEY
        }
    }
}

/// Title ID padded with zeroes to a full AES block
pub fn build_iv(title_id: &TitleId) -> [u8; 0x10] {
    let mut iv = [0u8; 0x10];
    iv[..0x8].copy_from_slice(&title_id.to_bytes());
    iv
}

/// Decrypts one title key block
pub fn decrypt_title_key(
    key: &[u8; 0x10],
    iv: &[u8; 0x10],
    title_key: &[u8; 0x10],
) -> Result<[u8; 0x10], CipherError> {
    let mut buf = *title_key;
    Aes128CbcDec::new_from_slices(key, iv)?.decrypt_padded_mut::<NoPadding>(&mut buf)?;
    Ok(buf)
}

/// Encrypts one title key block.
///
/// The cipher runs with PKCS#7 padding, so a 16 byte key comes out as 32 bytes. Only the first
/// block is stored in a ticket; in CBC mode it does not depend on the padding block.
pub fn encrypt_title_key(
    key: &[u8; 0x10],
    iv: &[u8; 0x10],
    title_key: &[u8; 0x10],
) -> Result<[u8; 0x10], CipherError> {
    let out = Aes128CbcEnc::new_from_slices(key, iv)?.encrypt_padded_vec_mut::<Pkcs7>(title_key);
    let first = out.get(..0x10).ok_or(CipherError::ShortOutput(out.len()))?;

    let mut stored = [0u8; 0x10];
    stored.copy_from_slice(first);
    Ok(stored)
}
