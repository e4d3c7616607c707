use thiserror::Error;

use crate::crypto::CryptoError;
use crate::headers::HeaderError;
use crate::records::RecordError;

/// Unified error for the encrypt/decrypt pipelines.
/// - `From<T>` impls let `?` carry module errors through the pipeline.
/// - Failure is terminal for the call; no partial output is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EceError {
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Detached-header decrypt called without a header.
    #[error("header is not embedded in the data and none was supplied")]
    MissingHeader,

    /// Worker pool failure (panicked worker, closed channel, lost result).
    #[error("pipeline error: {0}")]
    Pipeline(String),
}

impl EceError {
    /// True for AEAD tag mismatches: wrong secret, tampering or reordering.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, EceError::Crypto(CryptoError::AuthenticationFailed))
    }
}
