//! crypto/nonce.rs
//! Per-record nonce derivation from the base nonce and record sequence number.
//!
//! Design:
//! - RFC 8188 §2.3: XOR the sequence number, as a big-endian integer, into the
//!   base nonce. Sequence numbers here are bounded to 32 bits, so only the last
//!   4 bytes change and the first 8 are the base nonce verbatim.
//!
//! Why:
//! - Stateless derivation lets workers compute nonces independently from
//!   `(base_nonce, seq)` in any order.
//! - The counter never wraps: past `MAX_SEQUENCE` derivation fails, since a
//!   wrapped counter would repeat a nonce under the same CEK.

use byteorder::{BigEndian, ByteOrder};

use crate::constants::MAX_SEQUENCE;
use crate::crypto::types::{CryptoError, NONCE_LEN_12};

const COUNTER_OFFSET: usize = NONCE_LEN_12 - 4;

/// Derive the nonce for record `seq`.
///
/// Contract:
/// - `seq <= 0xFFFF_FFFF`, otherwise `CryptoError::SequenceExceeded`.
/// - Same `(base, seq)` always yields the same nonce; distinct `seq` values
///   yield distinct nonces.
#[inline]
pub fn derive_record_nonce(
    base: &[u8; NONCE_LEN_12],
    seq: u64,
) -> Result<[u8; NONCE_LEN_12], CryptoError> {
    validate_sequence(seq)?;

    let mut nonce = *base;
    let counter = BigEndian::read_u32(&nonce[COUNTER_OFFSET..]) ^ seq as u32;
    BigEndian::write_u32(&mut nonce[COUNTER_OFFSET..], counter);
    Ok(nonce)
}

#[inline]
pub fn validate_sequence(seq: u64) -> Result<(), CryptoError> {
    if seq > MAX_SEQUENCE {
        return Err(CryptoError::SequenceExceeded { seq, max: MAX_SEQUENCE });
    }
    Ok(())
}
