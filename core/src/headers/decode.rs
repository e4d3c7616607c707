//! headers/decode.rs
//!
//! Header decoding utilities.
//!
//! Design notes:
//! - Reads salt, big-endian rs, idlen and keyid from the front of a buffer.
//! - Trailing bytes (the records) are ignored; callers slice at `byte_len()`.
//! - A buffer that ends before `21 + idlen` is rejected rather than truncated.

use byteorder::{BigEndian, ByteOrder};

use crate::constants::{HEADER_LEN_MIN, RS_LEN, SALT_LEN};
use crate::headers::salt::Salt;
use crate::headers::types::{Header, HeaderError};
use crate::utils::{decode_base64, decode_base64_url};

/// Parse the header at the front of `buf`.
///
/// # Errors
/// - `HeaderError::HeaderSize` if `buf` is shorter than 21 bytes or than the
///   keyid length it announces.
/// - `HeaderError::RecordSize` if the encoded `rs` is below the minimum.
pub fn decode_header_be(buf: &[u8]) -> Result<Header, HeaderError> {
    if buf.len() < HEADER_LEN_MIN {
        return Err(HeaderError::HeaderSize { have: buf.len(), need: HEADER_LEN_MIN });
    }

    let salt = Salt::from_slice(&buf[..SALT_LEN])?;
    let rs = BigEndian::read_u32(&buf[SALT_LEN..SALT_LEN + RS_LEN]);
    let idlen = buf[SALT_LEN + RS_LEN] as usize;

    let need = HEADER_LEN_MIN + idlen;
    if buf.len() < need {
        return Err(HeaderError::HeaderSize { have: buf.len(), need });
    }
    let keyid = buf[HEADER_LEN_MIN..need].to_vec();

    Header::from_parts(salt, rs as u64, keyid)
}

impl Header {
    pub fn from_bytes(buf: &[u8]) -> Result<Self, HeaderError> {
        decode_header_be(buf)
    }

    pub fn from_base64(text: &str) -> Result<Self, HeaderError> {
        decode_header_be(&decode_base64(text)?)
    }

    pub fn from_base64_url(text: &str) -> Result<Self, HeaderError> {
        decode_header_be(&decode_base64_url(text)?)
    }
}
