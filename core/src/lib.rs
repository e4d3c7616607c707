//! ece-core
//!
//! RFC 8188 Encrypted Content-Encoding (`aes128gcm`) in pure Rust.
//! Header codec, HMAC-SHA256 key schedule, record padding and the
//! encrypt/decrypt pipelines, with an optional ordered worker pool.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod headers;
pub mod crypto;
pub mod records;
pub mod telemetry;

pub mod pipeline;

pub use pipeline::{
    decrypt, decrypt_with, decrypt_with_header, decrypt_with_telemetry, encrypt, encrypt_records,
    encrypt_records_with, encrypt_with, encrypt_with_telemetry,
};
pub use types::EceError;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::crypto::{CryptoEngine, CryptoError, CryptoProvider, RustCryptoProvider};
    pub use crate::headers::{Header, HeaderError, HeaderOptions, Salt};
    pub use crate::pipeline::{
        decrypt, decrypt_with_header, encrypt, encrypt_records, DecryptOptions, EncryptOptions,
        Parallelism,
    };
    pub use crate::records::{
        PaddedRecords, PaddingMode, PlainTextRecord, RecordError, RecordSource,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::EceError;
}
