//! This module handles the encoding and decoding of the coded payload.
//! In this module we decide the order of transformations: matching, and then
//! entropy coding of the token stream.
//!
//! The payload starts with one byte that holds the log2 of the window size,
//! followed by the bitstream: the code tables, the tokens, and zero padding
//! up to the byte boundary.

use crate::bits::{BitReader, BitWriter};
use crate::coding::entropy::{encode_tokens, TokenDecoder};
use crate::error::{Error, Result};
use crate::lz::matcher::MatchParams;
use crate::lz::{tokenize, Token, MAX_WINDOW_LOG, MIN_WINDOW_LOG};
use crate::{Context, Decoder, Encoder};

/// Serialize the token stream, with the window size 'window_log', into
/// 'output'. Returns the number of bytes written.
pub fn encode_token_stream(
    tokens: &[Token],
    window_log: u8,
    output: &mut Vec<u8>,
) -> Result<usize> {
    let mut bw = BitWriter::new();
    encode_tokens(tokens, &mut bw);
    let bits = bw.finish();

    output.try_reserve(1 + bits.len())?;
    output.push(window_log);
    output.extend_from_slice(&bits);
    Ok(1 + bits.len())
}

/// Append the bytes that 'token' produces to 'output'. The bytes before
/// 'base' belong to someone else and can't be referenced. Matches are copied
/// one byte at a time, so a distance that is shorter than the length repeats
/// the recent bytes.
fn apply_token(
    token: Token,
    output: &mut Vec<u8>,
    base: usize,
    limit: usize,
    window: usize,
) -> Result<()> {
    let written = output.len() - base;
    if written + token.output_len() > limit {
        return Err(Error::corrupt("token stream overshoots the declared length"));
    }

    match token {
        Token::Literal(byte) => output.push(byte),
        Token::Match { distance, length } => {
            let distance = distance as usize;
            if distance == 0 || distance > written {
                return Err(Error::corrupt(format!(
                    "match distance {} reaches before the output start",
                    distance
                )));
            }
            if distance > window {
                return Err(Error::corrupt(format!(
                    "match distance {} exceeds the window",
                    distance
                )));
            }
            let start = output.len() - distance;
            for i in 0..length as usize {
                let byte = output[start + i];
                output.push(byte);
            }
        }
    }
    Ok(())
}

/// Reconstruct 'expected_len' bytes from a list of tokens. The tokens must
/// produce exactly 'expected_len' bytes.
pub fn replay(tokens: &[Token], expected_len: usize) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    output.try_reserve(expected_len)?;
    let window = 1 << MAX_WINDOW_LOG;
    for token in tokens {
        apply_token(*token, &mut output, 0, expected_len, window)?;
    }
    if output.len() != expected_len {
        return Err(Error::corrupt("token stream ends before the declared length"));
    }
    Ok(output)
}

/// Drives the encoding of the coded payload.
pub struct BlockEncoder<'a> {
    /// The uncompressed input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
    /// Encoder context.
    ctx: Context,
}

impl<'a> BlockEncoder<'a> {
    fn encode_impl(&mut self) -> Result<usize> {
        let params = MatchParams::for_level(self.ctx.level);
        let tokens = tokenize(self.input, params)?;
        log::debug!(
            "Level {}: {} bytes turned into {} tokens",
            self.ctx.level,
            self.input.len(),
            tokens.len()
        );
        encode_token_stream(&tokens, params.window_log, self.output)
    }
}

/// Drives the decoding of the coded payload.
pub struct BlockDecoder<'a> {
    /// The coded payload.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
    /// The number of bytes that the payload must produce.
    expected_len: usize,
}

impl<'a> BlockDecoder<'a> {
    /// Set the number of bytes that the payload must produce.
    pub fn set_expected_len(&mut self, len: usize) {
        self.expected_len = len;
    }

    fn decode_impl(&mut self) -> Result<(usize, usize)> {
        let (&window_log, payload) = self
            .input
            .split_first()
            .ok_or(Error::UnexpectedEndOfStream)?;
        if !(MIN_WINDOW_LOG..=MAX_WINDOW_LOG).contains(&window_log) {
            return Err(Error::corrupt(format!(
                "invalid window size 2^{}",
                window_log
            )));
        }
        let window = 1usize << window_log;

        let mut decoder = TokenDecoder::new(BitReader::new(payload))?;
        let base = self.output.len();
        while self.output.len() - base < self.expected_len {
            let token = decoder.next_token()?;
            apply_token(token, self.output, base, self.expected_len, window)?;
        }

        decoder.finish()?;
        Ok((self.input.len(), self.expected_len))
    }
}

impl<'a> Encoder<'a> for BlockEncoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>, ctx: Context) -> Self {
        BlockEncoder { input, output, ctx }
    }

    fn encode(&mut self) -> Result<usize> {
        self.encode_impl()
    }
}

impl<'a> Decoder<'a> for BlockDecoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self {
        BlockDecoder {
            input,
            output,
            expected_len: 0,
        }
    }

    fn decode(&mut self) -> Result<(usize, usize)> {
        self.decode_impl()
    }
}
