//! constants.rs
//! Wire sizes and protocol constants for the aes128gcm content coding.
//!
//! Layout reference (RFC 8188 §2.1), all multi-byte integers big-endian:
//! - salt (16) | rs (4) | idlen (1) | keyid (idlen) | records...

/// Size (in bytes) of the salt block in the header.
pub const SALT_LEN: usize = 16;

/// Size (in bytes) of the record size block in the header.
pub const RS_LEN: usize = 4;

/// Size (in bytes) of the idlen block in the header.
pub const IDLEN_LEN: usize = 1;

/// Minimum size of a serialized header (no keyid).
pub const HEADER_LEN_MIN: usize = SALT_LEN + RS_LEN + IDLEN_LEN;

/// keyid length is carried in a single byte.
pub const KEYID_LEN_MAX: usize = u8::MAX as usize;

/// Content-encryption key length (AES-128).
pub const KEY_LEN_16: usize = 16;

/// AES-GCM nonce length.
pub const NONCE_LEN_12: usize = 12;

/// AEAD tag length (128-bit tag).
pub const TAG_LEN: usize = 16;

/// HMAC-SHA256 output length.
pub const PRK_LEN_32: usize = 32;

/// Default record size when Option<T> is None (64 KiB).
pub const DEFAULT_RECORD_SIZE: u64 = 64 * 1024;

/// Smallest record size: tag + delimiter + one data byte.
pub const RECORD_SIZE_MIN: u64 = 18;

/// Largest record size allowed by RFC 8188.
pub const RECORD_SIZE_MAX: u64 = (1u64 << 36) - 31;

/// Largest record size the 32-bit `rs` wire field can carry.
pub const RECORD_SIZE_WIRE_MAX: u64 = if RECORD_SIZE_MAX < u32::MAX as u64 {
    RECORD_SIZE_MAX
} else {
    u32::MAX as u64
};

/// Highest record sequence number; the nonce counter never wraps.
pub const MAX_SEQUENCE: u64 = 0xFFFF_FFFF;

/// Cap for the up-front output allocation; buffers grow past it on demand.
pub const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// Content-encryption key info (RFC 8188 §2.2).
pub const CEK_INFO: &[u8] = b"Content-Encoding: aes128gcm\0";

/// Nonce info (RFC 8188 §2.3).
pub const NONCE_INFO: &[u8] = b"Content-Encoding: nonce\0";

/// Single 0x01 octet appended to info for the one-block HKDF-Expand.
pub const ONE_BYTE: &[u8] = &[0x01];

/// Padding delimiter identifiers (mirrored in records).
pub mod delimiters {
    pub const RECORD: u8 = 0x01;
    pub const FINAL: u8 = 0x02;
}
