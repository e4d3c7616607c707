pub mod types;
pub mod provider;
pub mod kdf;
pub mod nonce;
pub mod engine;

pub use types::*;
pub use provider::*;
pub use kdf::*;
pub use nonce::*;
pub use engine::*;
