//! records/framer.rs
//! Default record source: splits a byte slice into padded plaintext records.
//!
//! Sizing, with `r = rs - 16` (plaintext bytes per record after the tag):
//! - every record but the last carries `d = r - 1 - extra_padding` data bytes,
//!   then the delimiter 0x01 and `extra_padding` zeros, totalling `r`;
//! - the last record carries the rest of the data, the delimiter 0x02 and as
//!   much of `extra_padding` as still fits in `r`;
//! - when the data left for the last record fits in the padding budget of the
//!   one before it, the two merge, so no record exists only to carry padding;
//! - empty input yields no records: the message is the header alone.
//!
//! Records are built on demand; the framer borrows the input and never copies
//! more than one record at a time.

use crate::constants::{RECORD_SIZE_MIN, TAG_LEN};
use crate::records::padding::pad;
use crate::records::types::{PlainTextRecord, RecordDelimiter, RecordError, RecordSource};

#[derive(Debug, Clone)]
pub struct PaddedRecords<'a> {
    data: &'a [u8],
    record_len: usize,
    data_len: usize,
    extra_padding: usize,
    count: usize,
    emitted: usize,
    cursor: usize,
}

impl<'a> PaddedRecords<'a> {
    pub fn new(data: &'a [u8], rs: u32) -> Result<Self, RecordError> {
        Self::with_padding(data, rs, 0)
    }

    /// Framer adding `extra_padding` zero bytes per record.
    ///
    /// Fails with `RecordError::ExtraPadding` unless
    /// `extra_padding <= rs - 18`, leaving at least one data byte per record.
    pub fn with_padding(
        data: &'a [u8],
        rs: u32,
        extra_padding: usize,
    ) -> Result<Self, RecordError> {
        if u64::from(rs) < RECORD_SIZE_MIN {
            return Err(RecordError::RecordSize { rs: u64::from(rs) });
        }
        let record_len = rs as usize - TAG_LEN;
        let max_padding = record_len - 2;
        if extra_padding > max_padding {
            return Err(RecordError::ExtraPadding { have: extra_padding, max: max_padding });
        }

        let data_len = record_len - 1 - extra_padding;
        let count = record_count(data.len(), data_len, extra_padding);

        Ok(Self { data, record_len, data_len, extra_padding, count, emitted: 0, cursor: 0 })
    }

    /// Data bytes carried by every record but the last.
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Padded plaintext size of a full record (`rs - 16`).
    pub fn record_len(&self) -> usize {
        self.record_len
    }

    pub fn extra_padding(&self) -> usize {
        self.extra_padding
    }

    /// Records not yet produced.
    pub fn remaining(&self) -> usize {
        self.count - self.emitted
    }
}

fn record_count(n: usize, data_len: usize, extra_padding: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut count = n.div_ceil(data_len);
    let leftover = n - (count - 1) * data_len;
    if count > 1 && leftover <= extra_padding {
        count -= 1;
    }
    count
}

impl RecordSource for PaddedRecords<'_> {
    fn record_count(&self) -> usize {
        self.count
    }

    fn has_next(&self) -> bool {
        self.emitted < self.count
    }

    fn next_record(&mut self) -> Option<PlainTextRecord> {
        if !self.has_next() {
            return None;
        }
        let is_final = self.emitted + 1 == self.count;

        let (chunk, padding) = if is_final {
            let rest = &self.data[self.cursor..];
            (rest, self.extra_padding.min(self.record_len - 1 - rest.len()))
        } else {
            (&self.data[self.cursor..self.cursor + self.data_len], self.extra_padding)
        };

        self.cursor += chunk.len();
        self.emitted += 1;
        Some(pad(chunk, padding, RecordDelimiter::for_position(is_final)))
    }
}

impl Iterator for PaddedRecords<'_> {
    type Item = PlainTextRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for PaddedRecords<'_> {}
