//! pipeline/mod.rs
//! Public encrypt/decrypt entry points over the record layer and crypto engine.

pub mod options;
pub mod encrypt;
pub mod decrypt;
pub(crate) mod parallel;

pub use options::*;
pub use encrypt::*;
pub use decrypt::*;

use crate::constants::DEFAULT_RECORD_SIZE;
use crate::crypto::{CryptoEngine, CryptoProvider};
use crate::headers::{Header, Salt};
use crate::types::EceError;

/// Engine for one message; a missing header gets a provider-drawn salt and
/// the default record size.
pub(crate) fn engine_for<P: CryptoProvider>(
    provider: P,
    secret: &[u8],
    header: Option<Header>,
    info: Option<&[u8]>,
) -> Result<CryptoEngine<P>, EceError> {
    let header = match header {
        Some(header) => header,
        None => {
            let salt = Salt::from_provider(&provider)?;
            Header::from_parts(salt, DEFAULT_RECORD_SIZE, Vec::new())?
        }
    };
    let engine = CryptoEngine::with_provider(provider, secret, header);
    Ok(match info {
        Some(info) => engine.with_info(info),
        None => engine,
    })
}
