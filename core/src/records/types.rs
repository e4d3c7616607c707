//! records/types.rs
//! Plaintext record newtype, delimiter registry, record source contract and errors.

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::delimiters;

/// Padding delimiter octet (RFC 8188 §2).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum RecordDelimiter {
    /// Every record but the last.
    Record = delimiters::RECORD,
    /// The last record of the message.
    Final = delimiters::FINAL,
}

impl RecordDelimiter {
    pub const fn for_position(is_final: bool) -> Self {
        if is_final {
            RecordDelimiter::Final
        } else {
            RecordDelimiter::Record
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One padded plaintext record: `data || delimiter || zeros`, ready to seal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainTextRecord(Vec<u8>);

impl PlainTextRecord {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for PlainTextRecord {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PlainTextRecord {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Lazy, forward-only sequence of padded plaintext records with a known count.
///
/// Implementations are single pass: once `next_record` returns `None` the
/// source is spent and must be rebuilt to iterate again. The encrypt pipeline
/// takes any implementation, which is how alternative padding strategies plug in.
///
/// Every record must be between 1 and `rs - 16` bytes long and end its
/// meaningful content with a delimiter, `0x02` on the last record only.
pub trait RecordSource {
    /// Total number of records this source produces.
    fn record_count(&self) -> usize;

    /// Whether another record is available.
    fn has_next(&self) -> bool;

    /// Produce the next record, advancing the cursor.
    fn next_record(&mut self) -> Option<PlainTextRecord>;
}

/// How decrypt treats the padding of opened records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// Truncate at the last 0x01/0x02 byte; keep the record whole if none exists.
    #[default]
    Lenient,
    /// RFC 8188 receiver rules: the last non-zero byte must be the delimiter
    /// expected for the record's position.
    Strict,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Record size cannot hold a tag, a delimiter and one data byte.
    #[error("record size {rs} is too small to carry data")]
    RecordSize { rs: u64 },

    /// Extra padding leaves no room for data.
    #[error("extra padding must be between 0 and {max}: got {have}")]
    ExtraPadding { have: usize, max: usize },

    /// A record source produced a record that would exceed `rs` once sealed.
    #[error("record {seq} is {len} bytes; at most {max} fit in one record")]
    RecordTooLarge { seq: u64, len: usize, max: usize },

    /// A record source produced an empty record (no room for a delimiter).
    #[error("record {seq} is empty")]
    EmptyRecord { seq: u64 },

    /// Ciphertext chunk too short to hold a tag and a delimiter.
    #[error("record {seq} is truncated: {len} bytes, need at least {min}")]
    TruncatedRecord { seq: u64, len: usize, min: usize },

    /// Strict mode: opened record is all zeros.
    #[error("record {seq} has no padding delimiter")]
    MissingDelimiter { seq: u64 },

    /// Strict mode: delimiter does not match the record's position.
    #[error("record {seq} has delimiter 0x{found:02x}, expected 0x{expected:02x}")]
    UnexpectedDelimiter { seq: u64, found: u8, expected: u8 },

    /// Record source produced a different number of records than it announced.
    #[error("record source announced {announced} records but produced {produced}")]
    CountMismatch { announced: usize, produced: usize },
}
