//! crypto/engine.rs
//! Per-message record encryption engine.
//!
//! Design notes:
//! - Owns the secret (IKM) and the header; PRK, CEK and base nonce are derived
//!   lazily and cached for the life of the engine.
//! - Each cached value sits behind a `OnceCell`: concurrent first callers block
//!   on the one in-flight derivation instead of racing duplicate provider calls.
//!   A failed derivation is not cached and will be retried by the next caller.
//! - After derivation every record operation is a pure function of
//!   `(CEK, base_nonce, seq)`, so records can be sealed or opened in any order
//!   and on any thread.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::constants::CEK_INFO;
use crate::crypto::kdf::{derive_base_nonce, derive_cek, derive_prk};
use crate::crypto::nonce::derive_record_nonce;
use crate::crypto::provider::{CryptoProvider, RustCryptoProvider};
use crate::crypto::types::{
    CryptoError, DerivationStats, EngineState, NONCE_LEN_12, PRK_LEN_32,
};
use crate::headers::Header;

#[derive(Default)]
struct DerivationCounters {
    prk: AtomicU64,
    cek: AtomicU64,
    base_nonce: AtomicU64,
}

pub struct CryptoEngine<P: CryptoProvider = RustCryptoProvider> {
    provider: P,
    header: Header,
    info: Vec<u8>,
    ikm: Zeroizing<Vec<u8>>,

    prk: OnceCell<Zeroizing<[u8; PRK_LEN_32]>>,
    cek: OnceCell<P::Key>,
    base_nonce: OnceCell<[u8; NONCE_LEN_12]>,

    counters: DerivationCounters,
}

impl CryptoEngine<RustCryptoProvider> {
    /// Engine over the default RustCrypto provider and the RFC CEK info.
    pub fn new(secret: &[u8], header: Header) -> Self {
        Self::with_provider(RustCryptoProvider, secret, header)
    }
}

impl<P: CryptoProvider> CryptoEngine<P> {
    pub fn with_provider(provider: P, secret: &[u8], header: Header) -> Self {
        Self {
            provider,
            header,
            info: CEK_INFO.to_vec(),
            ikm: Zeroizing::new(secret.to_vec()),
            prk: OnceCell::new(),
            cek: OnceCell::new(),
            base_nonce: OnceCell::new(),
            counters: DerivationCounters::default(),
        }
    }

    /// Replace the CEK info string. Only meaningful before the first record.
    pub fn with_info(mut self, info: impl Into<Vec<u8>>) -> Self {
        self.info = info.into();
        self.cek = OnceCell::new();
        self
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn info(&self) -> &[u8] {
        &self.info
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn state(&self) -> EngineState {
        match (self.prk.get(), self.cek.get(), self.base_nonce.get()) {
            (None, _, _) => EngineState::Fresh,
            (Some(_), Some(_), Some(_)) => EngineState::Ready,
            (Some(_), _, _) => EngineState::PrkDerived,
        }
    }

    pub fn derivation_stats(&self) -> DerivationStats {
        DerivationStats {
            prk: self.counters.prk.load(Ordering::Acquire),
            cek: self.counters.cek.load(Ordering::Acquire),
            base_nonce: self.counters.base_nonce.load(Ordering::Acquire),
        }
    }

    /// Pseudo-random key, derived on first use.
    pub fn prk(&self) -> Result<&[u8; PRK_LEN_32], CryptoError> {
        let prk = self.prk.get_or_try_init(|| {
            let prk = derive_prk(&self.provider, self.header.salt(), &self.ikm)?;
            self.counters.prk.fetch_add(1, Ordering::AcqRel);
            debug!(salt = %hex::encode(self.header.salt().as_bytes()), "derived PRK");
            Ok::<_, CryptoError>(prk)
        })?;
        Ok(&**prk)
    }

    /// Imported content-encryption key, derived on first use.
    pub fn cek(&self) -> Result<&P::Key, CryptoError> {
        self.cek.get_or_try_init(|| {
            let raw = derive_cek(&self.provider, self.prk()?, &self.info)?;
            let key = self.provider.import_aes128gcm_key(&raw[..])?;
            self.counters.cek.fetch_add(1, Ordering::AcqRel);
            debug!(info_len = self.info.len(), "derived CEK");
            Ok::<_, CryptoError>(key)
        })
    }

    /// Base nonce, derived on first use.
    pub fn base_nonce(&self) -> Result<&[u8; NONCE_LEN_12], CryptoError> {
        self.base_nonce.get_or_try_init(|| {
            let nonce = derive_base_nonce(&self.provider, self.prk()?)?;
            self.counters.base_nonce.fetch_add(1, Ordering::AcqRel);
            debug!("derived base nonce");
            Ok::<_, CryptoError>(nonce)
        })
    }

    /// Nonce for record `seq`; fails past `0xFFFF_FFFF`.
    pub fn nonce(&self, seq: u64) -> Result<[u8; NONCE_LEN_12], CryptoError> {
        derive_record_nonce(self.base_nonce()?, seq)
    }

    /// Force all three derivations; later record operations only read.
    pub fn prepare(&self) -> Result<(), CryptoError> {
        self.cek()?;
        self.base_nonce()?;
        Ok(())
    }

    /// Seal one padded plaintext record. Output is `record.len() + 16` bytes.
    pub fn encrypt_record(&self, record: &[u8], seq: u64) -> Result<Vec<u8>, CryptoError> {
        let nonce = self.nonce(seq)?;
        let sealed = self.provider.aes128gcm_seal(self.cek()?, &nonce, record)?;
        trace!(seq, plaintext_len = record.len(), ciphertext_len = sealed.len(), "sealed record");
        Ok(sealed)
    }

    /// Open one ciphertext record; the result still carries its padding.
    pub fn decrypt_record(&self, ciphertext: &[u8], seq: u64) -> Result<Vec<u8>, CryptoError> {
        let nonce = self.nonce(seq)?;
        let opened = self.provider.aes128gcm_open(self.cek()?, &nonce, ciphertext)?;
        trace!(
            seq,
            ciphertext_len = ciphertext.len(),
            plaintext_len = opened.len(),
            "opened record"
        );
        Ok(opened)
    }
}

impl<P: CryptoProvider> fmt::Debug for CryptoEngine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoEngine")
            .field("header", &self.header)
            .field("info_len", &self.info.len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
