//! A self-contained lossless compressor. The input is parsed into literals and
//! back-references by a Lempel–Ziv matcher, and the token stream is written
//! with canonical Huffman codes. Inputs that don't shrink are stored.

pub mod api;
pub mod bits;
pub mod block;
pub mod coding;
pub mod error;
pub mod lz;
pub mod stored;
pub mod stream;
pub mod utils;

pub use api::{
    compress, compress_file, compress_with, decompress, decompress_file,
    decompress_with, decompress_with_limit,
};
pub use error::{Error, ErrorKind, Result};

/// The version of the library, as major * 100 + minor * 10 + patch.
pub const VERSION_NUMBER: u32 = 200;
/// The version of the library as a string.
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// The compression level used when the caller does not pick one, or picks a
/// level outside of 0..=MAX_LEVEL.
pub const DEFAULT_LEVEL: u8 = 6;
/// The highest (slowest) compression level.
pub const MAX_LEVEL: u8 = 9;
/// The decoder refuses streams that declare a longer output (1GiB).
pub const DEFAULT_MAX_OUTPUT_SIZE: u64 = 1 << 30;

/// Map a user-provided level to a valid level.
pub fn clamp_level(level: i32) -> u8 {
    match u8::try_from(level) {
        Ok(level) if level <= MAX_LEVEL => level,
        _ => DEFAULT_LEVEL,
    }
}

/// Stores information about the environment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Context {
    /// Specifies the compression level.
    level: u8,
    /// The largest output that the decoder is willing to allocate.
    max_output_size: u64,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            max_output_size: DEFAULT_MAX_OUTPUT_SIZE,
        }
    }
}

impl Context {
    pub fn new(level: i32, max_output_size: u64) -> Self {
        Self {
            level: clamp_level(level),
            max_output_size,
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = clamp_level(level);
        self
    }

    pub fn with_max_output_size(mut self, max_output_size: u64) -> Self {
        self.max_output_size = max_output_size;
        self
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn max_output_size(&self) -> u64 {
        self.max_output_size
    }
}

/// A trait that defines the interface for encoding buffers.
pub trait Encoder<'a> {
    /// Creates a new Encoder that reads from 'input' and writes into 'output',
    /// with the encoder context 'ctx'.
    fn new(input: &'a [u8], output: &'a mut Vec<u8>, ctx: Context) -> Self;

    /// Encode the whole input buffer and return the number of bytes that were
    /// written into the output stream.
    fn encode(&mut self) -> Result<usize>;
}

/// A trait that defines the interface for decoding buffers.
pub trait Decoder<'a> {
    /// Creates a new Decoder that reads from 'input' and writes into 'output'.
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self;

    /// Try to decode the buffer 'input', and return the number of input bytes
    /// that were consumed followed by the number of bytes written, or an
    /// error if the input was invalid.
    fn decode(&mut self) -> Result<(usize, usize)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_package() {
        let expected = VERSION_STRING
            .split('.')
            .map(|part| part.parse::<u32>().unwrap())
            .fold(0, |acc, part| acc * 10 + part);
        assert_eq!(expected, VERSION_NUMBER);
    }

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(0), 0);
        assert_eq!(clamp_level(9), 9);
        assert_eq!(clamp_level(10), DEFAULT_LEVEL);
        assert_eq!(clamp_level(-1), DEFAULT_LEVEL);
        assert_eq!(Context::default().with_level(3).level(), 3);
    }
}
