//! headers/types.rs
//! Core header struct, construction options and header errors.
//!
//! Notes:
//! - `rs` is validated at construction; a `Header` value is always within
//!   `[RECORD_SIZE_MIN, RECORD_SIZE_WIRE_MAX]`.
//! - keyid is opaque and capped at 255 bytes since idlen is a single byte.
//! - Fields are private; the header never changes after construction.

use thiserror::Error;

use crate::constants::{
    DEFAULT_RECORD_SIZE, HEADER_LEN_MIN, KEYID_LEN_MAX, RECORD_SIZE_MAX, RECORD_SIZE_MIN,
    RECORD_SIZE_WIRE_MAX, TAG_LEN,
};
use crate::headers::salt::Salt;
use crate::utils::fmt_bytes;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Record size outside the accepted range.
    #[error("record size must be between {min} and {max}: got {have}")]
    RecordSize { have: u64, min: u64, max: u64 },

    /// Buffer too short to contain the header it describes.
    #[error("header block must be at least {need} bytes long: got {have}")]
    HeaderSize { have: usize, need: usize },

    /// Salt input is not exactly 16 bytes.
    #[error("salt length must be {need}: got {have}")]
    SaltLength { have: usize, need: usize },

    /// keyid does not fit in the single idlen byte.
    #[error("keyid must be at most {max} bytes: got {have}")]
    KeyIdTooLong { have: usize, max: usize },

    /// Text form is not valid base64 / base64url.
    #[error("invalid base64 header: {0}")]
    Base64(String),
}

impl From<base64::DecodeError> for HeaderError {
    fn from(e: base64::DecodeError) -> Self {
        HeaderError::Base64(e.to_string())
    }
}

/// Construction options; `None` fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct HeaderOptions {
    /// Defaults to a fresh random salt.
    pub salt: Option<Salt>,
    /// Defaults to 64 KiB.
    pub rs: Option<u64>,
    /// Defaults to empty.
    pub keyid: Vec<u8>,
}

impl HeaderOptions {
    pub fn with_salt(mut self, salt: Salt) -> Self {
        self.salt = Some(salt);
        self
    }

    pub fn with_rs(mut self, rs: u64) -> Self {
        self.rs = Some(rs);
        self
    }

    pub fn with_keyid(mut self, keyid: impl Into<Vec<u8>>) -> Self {
        self.keyid = keyid.into();
        self
    }
}

/// Encryption content-coding header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    salt: Salt,
    rs: u32,
    keyid: Vec<u8>,
}

impl Header {
    /// Build a header from options, defaulting salt, rs and keyid.
    pub fn new(options: HeaderOptions) -> Result<Self, HeaderError> {
        let HeaderOptions { salt, rs, keyid } = options;
        Self::from_parts(
            salt.unwrap_or_else(Salt::random),
            rs.unwrap_or(DEFAULT_RECORD_SIZE),
            keyid,
        )
    }

    /// Build a header from explicit parts.
    pub fn from_parts(salt: Salt, rs: u64, keyid: impl Into<Vec<u8>>) -> Result<Self, HeaderError> {
        let rs = validate_record_size(rs)?;
        let keyid = keyid.into();
        if keyid.len() > KEYID_LEN_MAX {
            return Err(HeaderError::KeyIdTooLong { have: keyid.len(), max: KEYID_LEN_MAX });
        }
        Ok(Self { salt, rs, keyid })
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Record size: on-wire length of every ciphertext record including its tag.
    pub fn rs(&self) -> u32 {
        self.rs
    }

    pub fn keyid(&self) -> &[u8] {
        &self.keyid
    }

    pub fn idlen(&self) -> u8 {
        // Bounded by KEYID_LEN_MAX at construction.
        self.keyid.len() as u8
    }

    /// Serialized length: salt + rs + idlen + keyid.
    pub fn byte_len(&self) -> usize {
        HEADER_LEN_MIN + self.keyid.len()
    }

    /// Plaintext capacity of one record (padding and delimiter included).
    pub fn record_plaintext_len(&self) -> usize {
        self.rs as usize - TAG_LEN
    }

    /// Byte-exact comparison of salt, rs and keyid.
    pub fn equals(&self, other: &Header) -> bool {
        self == other
    }

    /// Short diagnostic summary.
    pub fn summary(&self) -> String {
        format!(
            "Header {{ salt: {}, rs: {}, keyid: {} }}",
            hex::encode(self.salt.as_bytes()),
            self.rs,
            fmt_bytes(&self.keyid),
        )
    }
}

impl Default for Header {
    /// Fresh random salt, 64 KiB records, no keyid.
    fn default() -> Self {
        Self {
            salt: Salt::random(),
            rs: DEFAULT_RECORD_SIZE as u32,
            keyid: Vec::new(),
        }
    }
}

/// Check `rs` against the RFC bounds and the 32-bit wire field.
pub fn validate_record_size(rs: u64) -> Result<u32, HeaderError> {
    if !(RECORD_SIZE_MIN..=RECORD_SIZE_WIRE_MAX).contains(&rs) {
        return Err(HeaderError::RecordSize {
            have: rs,
            min: RECORD_SIZE_MIN,
            max: RECORD_SIZE_MAX.min(RECORD_SIZE_WIRE_MAX),
        });
    }
    Ok(rs as u32)
}
