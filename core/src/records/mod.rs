pub mod types;
pub mod padding;
pub mod framer;

pub use types::*;
pub use padding::*;
pub use framer::*;
