//! Configuration options for VDF decoding.
//!
//! ## Examples
//!
//! ```rust
//! use serde_vdf::{from_reader_with_options, DecoderOptions};
//! use std::collections::HashMap;
//!
//! // Read one byte at a time and tolerate a missing closing brace
//! let options = DecoderOptions::new()
//!     .with_chunk_size(1)
//!     .with_lenient_eof(true);
//!
//! let map: HashMap<String, String> =
//!     from_reader_with_options(&b"{ \"key\" \"value\" "[..], options).unwrap();
//! assert_eq!(map["key"], "value");
//! ```

/// Number of bytes requested from the source per read unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Largest number of bytes requested from the source in a single read.
pub const MAX_CHUNK_SIZE: usize = 1 << 20;

/// Configuration options for the VDF decoder.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::DecoderOptions;
///
/// let options = DecoderOptions::new();
/// assert_eq!(options.chunk_size, 64);
/// assert!(!options.lenient_eof);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Bytes requested from the source per read, between 1 and [`MAX_CHUNK_SIZE`].
    pub chunk_size: usize,
    /// Treat end of input in key-or-end position as closing every open object.
    pub lenient_eof: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            lenient_eof: false,
        }
    }
}

impl DecoderOptions {
    /// Creates default options (64-byte chunks, strict end of input).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many bytes are requested from the source per read.
    ///
    /// A size of zero is raised to one and sizes above [`MAX_CHUNK_SIZE`] are
    /// lowered to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::DecoderOptions;
    ///
    /// assert_eq!(DecoderOptions::new().with_chunk_size(4096).chunk_size, 4096);
    /// assert_eq!(DecoderOptions::new().with_chunk_size(0).chunk_size, 1);
    /// assert_eq!(
    ///     DecoderOptions::new().with_chunk_size(usize::MAX).chunk_size,
    ///     serde_vdf::MAX_CHUNK_SIZE
    /// );
    /// ```
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// Accepts input that ends while objects are still open.
    ///
    /// Only applies where a key or a closing brace is expected; input ending
    /// between a key and its value or inside a quoted token is still an error.
    #[must_use]
    pub fn with_lenient_eof(mut self, lenient: bool) -> Self {
        self.lenient_eof = lenient;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecoderOptions::default();
        assert_eq!(options.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!options.lenient_eof);
        assert_eq!(DecoderOptions::new(), options);
    }

    #[test]
    fn test_chunk_size_bounds() {
        assert_eq!(DecoderOptions::new().with_chunk_size(0).chunk_size, 1);
        assert_eq!(DecoderOptions::new().with_chunk_size(1).chunk_size, 1);
        assert_eq!(DecoderOptions::new().with_chunk_size(512).chunk_size, 512);
        assert_eq!(
            DecoderOptions::new().with_chunk_size(MAX_CHUNK_SIZE).chunk_size,
            MAX_CHUNK_SIZE
        );
        assert_eq!(
            DecoderOptions::new().with_chunk_size(usize::MAX).chunk_size,
            MAX_CHUNK_SIZE
        );
    }

    #[test]
    fn test_builder_chaining() {
        let options = DecoderOptions::new()
            .with_lenient_eof(true)
            .with_chunk_size(7)
            .with_lenient_eof(false)
            .with_lenient_eof(true);
        assert_eq!(
            options,
            DecoderOptions {
                chunk_size: 7,
                lenient_eof: true,
            }
        );
    }
}
