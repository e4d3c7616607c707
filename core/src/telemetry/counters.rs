//! telemetry/counters.rs
//! Mutable counters filled in while a message is encrypted or decrypted.
//!
//! Collected on the calling thread only; workers hand their results back and
//! the pipeline accounts for them in sequence order. Converted into an
//! immutable `TelemetrySnapshot` at the end of the call.

use serde::{Deserialize, Serialize};

use crate::constants::TAG_LEN;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub records: u64,
    /// Caller data bytes, without padding or delimiters.
    pub bytes_plaintext: u64,
    /// Delimiter and zero-padding bytes.
    pub bytes_padding: u64,
    /// Sealed record bytes, tags included.
    pub bytes_ciphertext: u64,
    /// Header, tags, delimiters and padding.
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Account for the serialized header, embedded or not.
    pub fn add_header(&mut self, header_len: usize) {
        self.bytes_overhead += header_len as u64;
    }

    /// Account for one record.
    ///
    /// - `data_len`: caller bytes carried by the record
    /// - `padded_len`: plaintext record length (data + delimiter + padding)
    pub fn add_record(&mut self, data_len: usize, padded_len: usize) {
        let padding = padded_len.saturating_sub(data_len) as u64;
        self.records += 1;
        self.bytes_plaintext += data_len as u64;
        self.bytes_padding += padding;
        self.bytes_ciphertext += (padded_len + TAG_LEN) as u64;
        self.bytes_overhead += padding + TAG_LEN as u64;
    }
}
