//! records/padding.rs
//! Record padding and padding removal.
//!
//! Layout of a padded record: `data || delimiter || zeros(pad_len)`. The
//! delimiter sits right after the data so that scanning back over the zero
//! padding lands on it.

use tracing::warn;

use crate::records::types::{PaddingMode, PlainTextRecord, RecordDelimiter, RecordError};

/// Pad `data` with its delimiter and `pad_len` zero bytes.
pub fn pad(data: &[u8], pad_len: usize, delimiter: RecordDelimiter) -> PlainTextRecord {
    let mut out = vec![0u8; data.len() + 1 + pad_len];
    out[..data.len()].copy_from_slice(data);
    out[data.len()] = delimiter.as_u8();
    PlainTextRecord::from(out)
}

/// Lenient padding removal: truncate at the last 0x01/0x02 byte.
///
/// Returns the record unchanged when no delimiter exists. RFC 8188 treats
/// that as an error; `unpad_strict` enforces it.
pub fn unpad(record: &[u8]) -> &[u8] {
    match record.iter().rposition(|&b| RecordDelimiter::try_from(b).is_ok()) {
        Some(i) => &record[..i],
        None => record,
    }
}

/// Strict padding removal for the record at position `seq`.
///
/// The last non-zero byte must be 0x02 when `is_final`, 0x01 otherwise.
pub fn unpad_strict(record: &[u8], seq: u64, is_final: bool) -> Result<&[u8], RecordError> {
    let i = record
        .iter()
        .rposition(|&b| b != 0)
        .ok_or(RecordError::MissingDelimiter { seq })?;

    let expected = RecordDelimiter::for_position(is_final).as_u8();
    if record[i] != expected {
        return Err(RecordError::UnexpectedDelimiter { seq, found: record[i], expected });
    }
    Ok(&record[..i])
}

/// Remove padding according to `mode`.
pub fn unpad_record(
    record: &[u8],
    seq: u64,
    is_final: bool,
    mode: PaddingMode,
) -> Result<&[u8], RecordError> {
    match mode {
        PaddingMode::Strict => unpad_strict(record, seq, is_final),
        PaddingMode::Lenient => {
            let out = unpad(record);
            if out.len() == record.len() {
                warn!(seq, len = record.len(), "record has no padding delimiter; kept as-is");
            }
            Ok(out)
        }
    }
}
