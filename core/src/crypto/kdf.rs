//! crypto/kdf.rs
//! Key schedule for aes128gcm (RFC 8188 §2.2, §2.3).
//!
//! Design:
//! - PRK   = HMAC-SHA256(salt, IKM)                       (HKDF-Extract)
//! - CEK   = HMAC-SHA256(PRK, cek_info || 0x01)[..16]     (HKDF-Expand, one block)
//! - NONCE = HMAC-SHA256(PRK, nonce_info || 0x01)[..12]   (HKDF-Expand, one block)
//!
//! Both outputs are shorter than one SHA-256 block, so a single HMAC call
//! with counter byte 0x01 is the full HKDF-Expand.

use zeroize::Zeroizing;

use crate::constants::{NONCE_INFO, ONE_BYTE};
use crate::crypto::provider::CryptoProvider;
use crate::crypto::types::{CryptoError, KEY_LEN_16, NONCE_LEN_12, PRK_LEN_32};
use crate::headers::Salt;

/// HKDF-Extract: PRK from the message salt and the caller's secret.
pub fn derive_prk<P: CryptoProvider + ?Sized>(
    provider: &P,
    salt: &Salt,
    ikm: &[u8],
) -> Result<Zeroizing<[u8; PRK_LEN_32]>, CryptoError> {
    provider.hmac_sha256(salt.as_bytes(), ikm).map(Zeroizing::new)
}

/// Raw 16-byte content-encryption key bound to `info`.
pub fn derive_cek<P: CryptoProvider + ?Sized>(
    provider: &P,
    prk: &[u8; PRK_LEN_32],
    info: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN_16]>, CryptoError> {
    let block = expand_one_block(provider, prk, info)?;
    let mut cek = Zeroizing::new([0u8; KEY_LEN_16]);
    cek.copy_from_slice(&block[..KEY_LEN_16]);
    Ok(cek)
}

/// 12-byte base nonce; per-record nonces are derived from it in `nonce.rs`.
pub fn derive_base_nonce<P: CryptoProvider + ?Sized>(
    provider: &P,
    prk: &[u8; PRK_LEN_32],
) -> Result<[u8; NONCE_LEN_12], CryptoError> {
    let block = expand_one_block(provider, prk, NONCE_INFO)?;
    let mut nonce = [0u8; NONCE_LEN_12];
    nonce.copy_from_slice(&block[..NONCE_LEN_12]);
    Ok(nonce)
}

#[inline]
fn expand_one_block<P: CryptoProvider + ?Sized>(
    provider: &P,
    prk: &[u8; PRK_LEN_32],
    info: &[u8],
) -> Result<Zeroizing<[u8; PRK_LEN_32]>, CryptoError> {
    let mut message = Vec::with_capacity(info.len() + ONE_BYTE.len());
    message.extend_from_slice(info);
    message.extend_from_slice(ONE_BYTE);
    provider.hmac_sha256(prk, &message).map(Zeroizing::new)
}
