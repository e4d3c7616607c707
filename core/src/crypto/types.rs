//! crypto/types.rs
//! Crypto error type, derived key sizes and engine state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::constants::{KEY_LEN_16, NONCE_LEN_12, PRK_LEN_32, TAG_LEN};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Nonce counter would wrap; the message has used up its sequence space.
    #[error("record sequence number exceeds limit ({max}): got {seq}")]
    SequenceExceeded { seq: u64, max: u64 },

    /// Key material of the wrong size handed to the provider.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    /// AEAD tag mismatch: wrong secret, wrong sequence or tampered record.
    #[error("AEAD authentication failed")]
    AuthenticationFailed,

    /// Secure random source unavailable.
    #[error("secure random source failed: {0}")]
    Random(String),

    /// Any other provider-side failure.
    #[error("crypto provider failure: {0}")]
    Provider(String),
}

/// Lifecycle of the memoized key schedule.
///
/// Transitions happen on first use of the corresponding derived value and
/// never go backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing derived yet.
    Fresh,
    /// PRK derived; CEK and/or base nonce still pending.
    PrkDerived,
    /// PRK, CEK and base nonce all derived.
    Ready,
}

/// How many times each derived value has been computed by one engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationStats {
    pub prk: u64,
    pub cek: u64,
    pub base_nonce: u64,
}

impl DerivationStats {
    /// Total provider HMAC invocations spent on derivation.
    pub fn total(&self) -> u64 {
        self.prk + self.cek + self.base_nonce
    }
}
