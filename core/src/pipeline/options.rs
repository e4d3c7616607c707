//! pipeline/options.rs
//! Caller-facing configuration for `encrypt` / `decrypt`.

use crate::headers::Header;
use crate::records::PaddingMode;

/// How many threads seal or open records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Records processed in order on the calling thread.
    #[default]
    Sequential,
    /// Fixed-size worker pool; `Fixed(0)` and `Fixed(1)` behave like `Sequential`.
    Fixed(usize),
    /// One worker per logical CPU, leaving one for the caller.
    Auto,
}

impl Parallelism {
    pub fn worker_count(&self) -> usize {
        match *self {
            Parallelism::Sequential => 1,
            Parallelism::Fixed(n) => n.max(1),
            Parallelism::Auto => num_cpus::get().saturating_sub(1).max(1),
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.worker_count() > 1
    }
}

#[derive(Debug, Clone)]
pub struct EncryptOptions {
    /// Header to encrypt under; a fresh salt and 64 KiB records when `None`.
    pub header: Option<Header>,
    /// CEK info override; `Content-Encoding: aes128gcm\0` when `None`.
    pub info: Option<Vec<u8>>,
    /// Zero bytes added to every record.
    pub extra_padding: usize,
    /// Prefix the output with the serialized header.
    pub embed_header: bool,
    pub parallelism: Parallelism,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self {
            header: None,
            info: None,
            extra_padding: 0,
            embed_header: true,
            parallelism: Parallelism::Sequential,
        }
    }
}

impl EncryptOptions {
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_info(mut self, info: impl Into<Vec<u8>>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_extra_padding(mut self, extra_padding: usize) -> Self {
        self.extra_padding = extra_padding;
        self
    }

    /// Emit records only; the header travels out of band.
    pub fn detached(mut self) -> Self {
        self.embed_header = false;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DecryptOptions {
    /// Header to decrypt under; parsed from the data when `None`.
    pub header: Option<Header>,
    pub info: Option<Vec<u8>>,
    /// Data starts with the serialized header.
    pub header_embedded: bool,
    pub padding: PaddingMode,
    pub parallelism: Parallelism,
}

impl Default for DecryptOptions {
    fn default() -> Self {
        Self {
            header: None,
            info: None,
            header_embedded: true,
            padding: PaddingMode::Lenient,
            parallelism: Parallelism::Sequential,
        }
    }
}

impl DecryptOptions {
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_info(mut self, info: impl Into<Vec<u8>>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Data holds records only; requires `with_header`.
    pub fn detached(mut self) -> Self {
        self.header_embedded = false;
        self
    }

    pub fn strict(mut self) -> Self {
        self.padding = PaddingMode::Strict;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_counts() {
        assert_eq!(Parallelism::Sequential.worker_count(), 1);
        assert_eq!(Parallelism::Fixed(0).worker_count(), 1);
        assert_eq!(Parallelism::Fixed(4).worker_count(), 4);
        assert!(Parallelism::Auto.worker_count() >= 1);
        assert!(!Parallelism::Fixed(1).is_parallel());
    }

    #[test]
    fn defaults_embed_header_and_stay_lenient() {
        let e = EncryptOptions::default();
        assert!(e.embed_header);
        assert_eq!(e.extra_padding, 0);

        let d = DecryptOptions::default();
        assert!(d.header_embedded);
        assert_eq!(d.padding, PaddingMode::Lenient);
        assert_eq!(d.clone().strict().padding, PaddingMode::Strict);
    }
}
