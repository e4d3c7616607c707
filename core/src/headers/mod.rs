//! headers/mod.rs
//! Public module export for the content-coding header.
//!
//! Notes:
//! - Variable-length header: 16-byte salt, 32-bit record size, length-prefixed keyid.
//! - Big-endian on the wire, as RFC 8188 §2.1 requires.
//! - The salt is the only per-message input to key derivation; never reuse one
//!   with the same secret.

pub mod salt;
pub mod types;
pub mod encode;
pub mod decode;

pub use salt::*;
pub use types::*;
pub use encode::*;
pub use decode::*;
