//! headers/salt.rs
//! Per-message salt.
//!
//! Design notes:
//! - Exactly 16 bytes, owned inline; constructing from a slice copies, so later
//!   mutation of the caller's buffer never reaches the salt.
//! - Default construction draws from the OS CSPRNG.
//! - Immutable after construction; equality is byte-exact.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::SALT_LEN;
use crate::crypto::provider::CryptoProvider;
use crate::crypto::types::CryptoError;
use crate::headers::types::HeaderError;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Fresh salt from the operating system's secure random source.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Fresh salt from an explicit provider's random source.
    pub fn from_provider<P: CryptoProvider + ?Sized>(provider: &P) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; SALT_LEN];
        provider.fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Copy exactly 16 bytes out of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HeaderError> {
        let arr: [u8; SALT_LEN] = bytes.try_into().map_err(|_| HeaderError::SaltLength {
            have: bytes.len(),
            need: SALT_LEN,
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl Default for Salt {
    fn default() -> Self {
        Self::random()
    }
}

impl From<[u8; SALT_LEN]> for Salt {
    fn from(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Salt {
    type Error = HeaderError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl AsRef<[u8]> for Salt {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", hex::encode(self.0))
    }
}
