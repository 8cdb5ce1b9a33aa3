//! Ticket record.
//!
//! A ticket is a fixed 0x2a4 byte record carrying the encrypted title key of a title along with
//! its licensing data. All multi-byte integers are little-endian.

use derivative::Derivative;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::crypto::{self, KeyType};
use crate::string::SizedCString;
use crate::titleid::TitleId;
use crate::{Result, WadtikError};

/// Size of an encoded ticket
pub const TICKET_SIZE: usize = 0x2a4;
/// Number of time limit entries, the table is not length-prefixed
pub const TIME_LIMIT_COUNT: usize = 8;

const_assert_eq!(
    TICKET_SIZE,
    4 + 0x100 + 0x3c + 0x40 + 0x3c + 3 + 0x10 + 1 + 8 + 4 + 8 + 2 + 2 + 4 + 4 + 2 + 0x72
        + TIME_LIMIT_COUNT * 8
);

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeLimitEntry {
    pub code: u32,
    pub limit: u32,
}

/// A decoded ticket.
///
/// The title key is always held decrypted, it's only encrypted again while encoding. The serde
/// form mirrors the in-memory one, so it carries the decrypted key too.
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ticket {
    signature_type: u32,
    #[derivative(Debug = "ignore")]
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    signature: [u8; 0x100],
    #[derivative(Debug = "ignore")]
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    _padding0: [u8; 0x3c],
    issuer: SizedCString<0x40>,
    #[derivative(Debug = "ignore")]
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    ecdh_data: [u8; 0x3c],
    file_version: u8,
    ca_crl_version: u8,
    signer_crl_version: u8,
    title_key: [u8; 0x10],
    #[derivative(Debug = "ignore")] _padding1: u8,
    ticket_id: u64,
    console_id: u32,
    title_id: TitleId,
    system_access_mask: u16,
    title_version: u16,
    access_title_id: u32,
    access_title_mask: u32,
    license_type: u8,
    key_type: KeyType,
    #[derivative(Debug = "ignore")]
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    _unknown: [u8; 0x72],
    time_limits: [TimeLimitEntry; TIME_LIMIT_COUNT],
}

/// Read cursor over a ticket buffer, every read is bounds-checked
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
    fn take(&mut self, what: &'static str, len: usize) -> Result<&'a [u8]> {
        let expected = self.pos.saturating_add(len);
        let chunk = self
            .bytes
            .get(self.pos..expected)
            .ok_or(WadtikError::TruncatedInput {
                what,
                actual: self.bytes.len(),
                expected,
            })?;
        self.pos = expected;
        Ok(chunk)
    }
    fn array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(what, N)?);
        Ok(out)
    }
    fn u8(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.array::<1>(what)?[0])
    }
    fn u16(&mut self, what: &'static str) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array(what)?))
    }
    fn u32(&mut self, what: &'static str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array(what)?))
    }
    fn u64(&mut self, what: &'static str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array(what)?))
    }
    fn time_limits(&mut self) -> Result<[TimeLimitEntry; TIME_LIMIT_COUNT]> {
        let mut limits = [TimeLimitEntry::default(); TIME_LIMIT_COUNT];
        for entry in limits.iter_mut() {
            entry.code = self.u32("time limit code")?;
            entry.limit = self.u32("time limit")?;
        }
        Ok(limits)
    }
}

impl Ticket {
    /// Decodes a ticket from the first [`TICKET_SIZE`] bytes of `bytes` and decrypts its title
    /// key. Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < TICKET_SIZE {
            return Err(WadtikError::TruncatedInput {
                what: "ticket",
                actual: bytes.len(),
                expected: TICKET_SIZE,
            });
        }

        // struct expressions evaluate in source order, which is the on-disk order
        let mut r = Reader::new(bytes);
        let mut ticket = Self {
            signature_type: r.u32("signature type")?,
            signature: r.array("signature")?,
            _padding0: r.array("signature padding")?,
            issuer: SizedCString::from(r.array("issuer")?),
            ecdh_data: r.array("ECDH data")?,
            file_version: r.u8("file version")?,
            ca_crl_version: r.u8("CA CRL version")?,
            signer_crl_version: r.u8("signer CRL version")?,
            title_key: r.array("title key")?,
            _padding1: r.u8("title key padding")?,
            ticket_id: r.u64("ticket id")?,
            console_id: r.u32("console id")?,
            title_id: TitleId::from(r.array("title id")?),
            system_access_mask: r.u16("system access mask")?,
            title_version: r.u16("title version")?,
            access_title_id: r.u32("access title id")?,
            access_title_mask: r.u32("access title mask")?,
            license_type: r.u8("license type")?,
            key_type: KeyType::from(r.u8("key type")?),
            _unknown: r.array("unknown")?,
            time_limits: r.time_limits()?,
        };
        debug_assert_eq!(r.pos, TICKET_SIZE);

        ticket.decrypt_title_key()?;
        log::trace!(
            "decoded ticket {:016x} for title {} ({} key)",
            ticket.ticket_id,
            ticket.title_id,
            ticket.key_type
        );
        Ok(ticket)
    }

    /// Encodes the ticket into [`TICKET_SIZE`] bytes, with the title key encrypted.
    ///
    /// `self` is left untouched, encryption happens on a copy.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut sealed = self.clone();
        sealed.encrypt_title_key()?;

        let mut buf = Vec::with_capacity(TICKET_SIZE);
        buf.extend_from_slice(&sealed.signature_type.to_le_bytes());
        buf.extend_from_slice(&sealed.signature);
        buf.extend_from_slice(&sealed._padding0);
        buf.extend_from_slice(sealed.issuer.data());
        buf.extend_from_slice(&sealed.ecdh_data);
        buf.push(sealed.file_version);
        buf.push(sealed.ca_crl_version);
        buf.push(sealed.signer_crl_version);
        buf.extend_from_slice(&sealed.title_key);
        buf.push(sealed._padding1);
        buf.extend_from_slice(&sealed.ticket_id.to_le_bytes());
        buf.extend_from_slice(&sealed.console_id.to_le_bytes());
        buf.extend_from_slice(&sealed.title_id.to_bytes());
        buf.extend_from_slice(&sealed.system_access_mask.to_le_bytes());
        buf.extend_from_slice(&sealed.title_version.to_le_bytes());
        buf.extend_from_slice(&sealed.access_title_id.to_le_bytes());
        buf.extend_from_slice(&sealed.access_title_mask.to_le_bytes());
        buf.push(sealed.license_type);
        buf.push(sealed.key_type.into());
        buf.extend_from_slice(&sealed._unknown);
        for entry in &sealed.time_limits {
            buf.extend_from_slice(&entry.code.to_le_bytes());
            buf.extend_from_slice(&entry.limit.to_le_bytes());
        }
        debug_assert_eq!(buf.len(), TICKET_SIZE);

        log::trace!("encoded ticket {:016x} for title {}", self.ticket_id, self.title_id);
        Ok(buf)
    }

    /// Common key the title key is encrypted with
    pub fn common_key(&self) -> &'static [u8; 0x10] {
        crypto::select_key(self.key_type)
    }
    /// IV used for the title key
    pub fn iv(&self) -> [u8; 0x10] {
        crypto::build_iv(&self.title_id)
    }
    /// The title key as it would be stored on disk
    pub fn encrypted_title_key(&self) -> Result<[u8; 0x10]> {
        Ok(crypto::encrypt_title_key(self.common_key(), &self.iv(), &self.title_key)?)
    }

    fn decrypt_title_key(&mut self) -> Result<()> {
        self.title_key = crypto::decrypt_title_key(self.common_key(), &self.iv(), &self.title_key)?;
        Ok(())
    }
    fn encrypt_title_key(&mut self) -> Result<()> {
        self.title_key = self.encrypted_title_key()?;
        Ok(())
    }

    pub fn signature_type(&self) -> u32 { self.signature_type }
    pub fn signature(&self) -> &[u8; 0x100] { &self.signature }
    pub fn issuer(&self) -> &SizedCString<0x40> { &self.issuer }
    pub fn ecdh_data(&self) -> &[u8; 0x3c] { &self.ecdh_data }
    pub fn file_version(&self) -> u8 { self.file_version }
    pub fn ca_crl_version(&self) -> u8 { self.ca_crl_version }
    pub fn signer_crl_version(&self) -> u8 { self.signer_crl_version }
    /// Decrypted title key
    pub fn title_key(&self) -> &[u8; 0x10] { &self.title_key }
    pub fn ticket_id(&self) -> u64 { self.ticket_id }
    pub fn console_id(&self) -> u32 { self.console_id }
    pub fn title_id(&self) -> TitleId { self.title_id }
    pub fn system_access_mask(&self) -> u16 { self.system_access_mask }
    pub fn title_version(&self) -> u16 { self.title_version }
    pub fn access_title_id(&self) -> u32 { self.access_title_id }
    pub fn access_title_mask(&self) -> u32 { self.access_title_mask }
    pub fn license_type(&self) -> u8 { self.license_type }
    pub fn key_type(&self) -> KeyType { self.key_type }
    pub fn time_limits(&self) -> &[TimeLimitEntry; TIME_LIMIT_COUNT] { &self.time_limits }

    pub fn set_issuer(&mut self, issuer: SizedCString<0x40>) { self.issuer = issuer; }
    /// Replaces the decrypted title key
    pub fn set_title_key(&mut self, key: [u8; 0x10]) { self.title_key = key; }
    /// Changes the title ID, which also changes the IV the title key is encrypted with on encode
    pub fn set_title_id(&mut self, title_id: TitleId) { self.title_id = title_id; }
    /// Changes the common key the title key is encrypted with on encode
    pub fn set_key_type(&mut self, key_type: KeyType) { self.key_type = key_type; }
    pub fn set_title_version(&mut self, version: u16) { self.title_version = version; }
    pub fn set_time_limits(&mut self, limits: [TimeLimitEntry; TIME_LIMIT_COUNT]) { self.time_limits = limits; }
}
