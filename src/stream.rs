//! Handles the encoding of the whole buffer. This module writes the header,
//! selects the payload mode and calls the block compressor.
//!
//! Layout: [tag] [version] [original length: u64 big-endian] [mode] [payload]

use crate::block::{BlockDecoder, BlockEncoder};
use crate::error::{Error, Result};
use crate::stored::{StoredDecoder, StoredEncoder};
use crate::utils::number_encoding::{decode64, encode64};
use crate::utils::signatures::{
    FORMAT_TAG, FORMAT_VERSION, HEADER_SIZE, MODE_CODED, MODE_STORED,
};
use crate::{Context, Decoder, Encoder, DEFAULT_MAX_OUTPUT_SIZE};

/// Inputs shorter than this are always stored.
pub const MIN_CODED_SIZE: usize = 16;

/// Write the stream header into 'output'.
fn write_header(len: usize, mode: u8, output: &mut Vec<u8>) {
    output.push(FORMAT_TAG);
    output.push(FORMAT_VERSION);
    let _ = encode64(len as u64, output);
    output.push(mode);
}

/// Try to perform block encoding, but if it's not useful use stored encoding
/// instead. Returns the mode and the payload.
fn encode_or_stored(input: &[u8], ctx: Context) -> Result<(u8, Vec<u8>)> {
    let mut encoded: Vec<u8> = Vec::new();
    if ctx.level > 0 && input.len() >= MIN_CODED_SIZE {
        let new_size = BlockEncoder::new(input, &mut encoded, ctx).encode()?;
        if new_size < input.len() {
            return Ok((MODE_CODED, encoded));
        }
        log::debug!(
            "Coded payload of {} bytes is not smaller than the input, storing",
            new_size
        );
        encoded.clear();
    }
    let _ = StoredEncoder::new(input, &mut encoded, ctx).encode()?;
    Ok((MODE_STORED, encoded))
}

pub struct StreamEncoder<'a> {
    /// The uncompressed input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
    /// Encoder context,
    ctx: Context,
}

impl<'a> Encoder<'a> for StreamEncoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>, ctx: Context) -> Self {
        StreamEncoder { input, output, ctx }
    }

    fn encode(&mut self) -> Result<usize> {
        let (mode, payload) = encode_or_stored(self.input, self.ctx)?;
        self.output.try_reserve(HEADER_SIZE + payload.len())?;
        write_header(self.input.len(), mode, self.output);
        self.output.extend_from_slice(&payload);

        log::debug!(
            "Encoded {} bytes into {} bytes (mode {})",
            self.input.len(),
            HEADER_SIZE + payload.len(),
            mode
        );
        Ok(HEADER_SIZE + payload.len())
    }
}

pub struct StreamDecoder<'a> {
    /// The compressed input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
    /// Streams that declare a longer output are rejected.
    max_output_size: u64,
}

impl<'a> StreamDecoder<'a> {
    /// Set the largest output length that the decoder accepts.
    pub fn set_max_output_size(&mut self, size: u64) {
        self.max_output_size = size;
    }

    /// Validate the header and return the declared length and the mode.
    fn read_header(&self) -> Result<(usize, u8)> {
        if self.input.len() < HEADER_SIZE {
            return Err(Error::InvalidArgument(format!(
                "input of {} bytes is shorter than the {} byte header",
                self.input.len(),
                HEADER_SIZE
            )));
        }
        if self.input[0] != FORMAT_TAG {
            return Err(Error::corrupt("unknown format tag"));
        }
        if self.input[1] != FORMAT_VERSION {
            return Err(Error::corrupt(format!(
                "unsupported format version {}",
                self.input[1]
            )));
        }

        let (_, len) =
            decode64(&self.input[2..]).ok_or(Error::UnexpectedEndOfStream)?;
        if len > self.max_output_size {
            return Err(Error::OutOfMemory(format!(
                "declared length {} exceeds the limit of {} bytes",
                len, self.max_output_size
            )));
        }
        let len = usize::try_from(len).map_err(|_| {
            Error::OutOfMemory(format!("declared length {} is not addressable", len))
        })?;

        let mode = self.input[HEADER_SIZE - 1];
        if mode != MODE_STORED && mode != MODE_CODED {
            return Err(Error::corrupt(format!("unknown payload mode {}", mode)));
        }
        Ok((len, mode))
    }

    fn decode_impl(&mut self) -> Result<(usize, usize)> {
        let (len, mode) = self.read_header()?;
        let input = self.input;
        let payload = &input[HEADER_SIZE..];
        log::debug!(
            "Decoding {} payload bytes into {} bytes (mode {})",
            payload.len(),
            len,
            mode
        );

        let (read, written) = if mode == MODE_STORED {
            let mut decoder = StoredDecoder::new(payload, self.output);
            decoder.set_expected_len(len);
            decoder.decode()?
        } else {
            self.output.try_reserve(len)?;
            let mut decoder = BlockDecoder::new(payload, self.output);
            decoder.set_expected_len(len);
            decoder.decode()?
        };

        debug_assert_eq!(written, len);
        Ok((HEADER_SIZE + read, written))
    }
}

impl<'a> Decoder<'a> for StreamDecoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self {
        StreamDecoder {
            input,
            output,
            max_output_size: DEFAULT_MAX_OUTPUT_SIZE,
        }
    }

    /// Decode the stream. On failure nothing is appended to the output, and a
    /// truncated stream is reported as corrupt.
    fn decode(&mut self) -> Result<(usize, usize)> {
        let start = self.output.len();
        self.decode_impl().map_err(|err| {
            self.output.truncate(start);
            match err {
                Error::UnexpectedEndOfStream => {
                    Error::corrupt("unexpected end of stream")
                }
                err => err,
            }
        })
    }
}
