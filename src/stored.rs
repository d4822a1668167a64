//! This is a simple encoder that copies the input without changing it. It is
//! used for inputs that the coded representation does not shrink.

use crate::error::{Error, Result};
use crate::{Context, Decoder, Encoder};

pub struct StoredEncoder<'a> {
    /// The uncompressed input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
}

impl<'a> StoredEncoder<'a> {
    fn encode_impl(&mut self) -> Result<usize> {
        self.output.try_reserve(self.input.len())?;
        self.output.extend_from_slice(self.input);
        Ok(self.input.len())
    }
}

pub struct StoredDecoder<'a> {
    /// The stored payload.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
    /// The length that the header declared.
    expected_len: usize,
}

impl<'a> StoredDecoder<'a> {
    /// Set the number of bytes that the payload must hold.
    pub fn set_expected_len(&mut self, len: usize) {
        self.expected_len = len;
    }

    fn decode_impl(&mut self) -> Result<(usize, usize)> {
        if self.input.len() != self.expected_len {
            return Err(Error::corrupt(format!(
                "stored payload holds {} bytes, expected {}",
                self.input.len(),
                self.expected_len
            )));
        }
        self.output.try_reserve(self.input.len())?;
        self.output.extend_from_slice(self.input);
        Ok((self.input.len(), self.input.len()))
    }
}

impl<'a> Encoder<'a> for StoredEncoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>, _ctx: Context) -> Self {
        StoredEncoder { input, output }
    }

    fn encode(&mut self) -> Result<usize> {
        self.encode_impl()
    }
}

impl<'a> Decoder<'a> for StoredDecoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self {
        let expected_len = input.len();
        StoredDecoder {
            input,
            output,
            expected_len,
        }
    }

    fn decode(&mut self) -> Result<(usize, usize)> {
        self.decode_impl()
    }
}
