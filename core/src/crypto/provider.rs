//! crypto/provider.rs
//! Cryptographic capability passed into the engine.
//!
//! Design notes:
//! - The protocol logic never reaches for a global crypto backend; everything
//!   goes through a `CryptoProvider` so test doubles or hardware backends can
//!   be substituted.
//! - AES-128-GCM with a 128-bit tag appended to the ciphertext; the caller
//!   supplies the 96-bit nonce.
//! - Tag verification must fail closed (no partial plaintext).

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::crypto::types::{CryptoError, KEY_LEN_16, NONCE_LEN_12, PRK_LEN_32, TAG_LEN};

type HmacSha256 = Hmac<Sha256>;

pub trait CryptoProvider: Send + Sync {
    /// Imported AES-128-GCM key, ready for repeated seal/open calls.
    type Key: Send + Sync;

    /// Fill `dest` from a cryptographically secure source.
    fn fill_random(&self, dest: &mut [u8]) -> Result<(), CryptoError>;

    /// HMAC-SHA256(key, message).
    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<[u8; PRK_LEN_32], CryptoError>;

    /// Load 16 raw bytes as an AES-128-GCM key.
    fn import_aes128gcm_key(&self, raw: &[u8]) -> Result<Self::Key, CryptoError>;

    /// Encrypt; returns ciphertext with the 16-byte tag appended.
    fn aes128gcm_seal(
        &self,
        key: &Self::Key,
        nonce: &[u8; NONCE_LEN_12],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt and verify `ciphertext || tag`.
    fn aes128gcm_open(
        &self,
        key: &Self::Key,
        nonce: &[u8; NONCE_LEN_12],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

/// Default provider backed by the RustCrypto crates and the OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl CryptoProvider for RustCryptoProvider {
    type Key = Aes128Gcm;

    fn fill_random(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::Random(e.to_string()))
    }

    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<[u8; PRK_LEN_32], CryptoError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
            .map_err(|e| CryptoError::Provider(format!("HMAC key rejected: {e}")))?;
        mac.update(message);

        let mut out = [0u8; PRK_LEN_32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }

    fn import_aes128gcm_key(&self, raw: &[u8]) -> Result<Self::Key, CryptoError> {
        Aes128Gcm::new_from_slice(raw).map_err(|_| CryptoError::InvalidKeyLen {
            expected: KEY_LEN_16,
            actual: raw.len(),
        })
    }

    fn aes128gcm_seal(
        &self,
        key: &Self::Key,
        nonce: &[u8; NONCE_LEN_12],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        key.encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|_| CryptoError::Provider("AES-GCM seal failed".into()))
    }

    fn aes128gcm_open(
        &self,
        key: &Self::Key,
        nonce: &[u8; NONCE_LEN_12],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < TAG_LEN {
            return Err(CryptoError::AuthenticationFailed);
        }
        key.decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}
