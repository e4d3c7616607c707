//! headers/encode.rs
//!
//! Header encoding utilities.
//!
//! Design notes:
//! - Serializes a `Header` into `21 + idlen` bytes, multi-byte fields big-endian.
//! - Field order must match `decode.rs` exactly.
//! - Headers are validated at construction, so encoding cannot fail.

use byteorder::{BigEndian, ByteOrder};

use crate::constants::{HEADER_LEN_MIN, RS_LEN, SALT_LEN};
use crate::headers::types::Header;
use crate::utils::{encode_base64, encode_base64_url};

/// Serialize a `Header` into its wire form.
///
/// Layout:
///
/// ```text
/// [ salt  (16) ]
/// [ rs    (4)  ] big-endian
/// [ idlen (1)  ]
/// [ keyid (idlen) ]
/// ```
pub fn encode_header_be(h: &Header) -> Vec<u8> {
    let mut out = vec![0u8; h.byte_len()];

    out[..SALT_LEN].copy_from_slice(h.salt().as_bytes());              // 0..16  salt
    BigEndian::write_u32(&mut out[SALT_LEN..SALT_LEN + RS_LEN], h.rs()); // 16..20 rs
    out[SALT_LEN + RS_LEN] = h.idlen();                                  // 20     idlen
    out[HEADER_LEN_MIN..].copy_from_slice(h.keyid());                    // 21..   keyid

    out
}

impl Header {
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_header_be(self)
    }

    /// Standard base64, padded.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.to_bytes())
    }

    /// URL-safe base64, unpadded.
    pub fn to_base64_url(&self) -> String {
        encode_base64_url(&self.to_bytes())
    }
}
