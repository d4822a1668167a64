//! Entropy coding of the token stream.
//!
//! Literals and match lengths share one alphabet: symbols 0..256 are literal
//! bytes and the symbols above them are length codes. Distances use a second
//! alphabet. Both lengths and distances are split into a code and extra bits
//! (see 'split_encoding'), so the tables stay small no matter how long the
//! matches are.

use crate::bits::{BitReader, BitWriter};
use crate::coding::hist::Histogram;
use crate::coding::huffman::{
    build_code_lengths, read_lengths, write_lengths, HuffmanDecoder,
    HuffmanEncoder,
};
use crate::error::{Error, Result};
use crate::lz::{Token, MAX_MATCH, MIN_MATCH};
use crate::utils::split_encoding::{join32, split32};

/// Number of literal symbols in the literal/length alphabet.
pub const LITERAL_CODES: usize = 256;
/// Number of length codes. Lengths up to MAX_MATCH need 16 codes.
pub const LENGTH_CODES: usize = 16;
/// Size of the combined literal/length alphabet.
pub const LITLEN_CODES: usize = LITERAL_CODES + LENGTH_CODES;
/// Size of the distance alphabet. Covers distances up to 1 << 25.
pub const DISTANCE_CODES: usize = 25;

/// Returns the (symbol, extra bits, number of extra bits) of a match length.
pub fn length_symbol(length: usize) -> (usize, u32, usize) {
    debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&length));
    let (code, extra, bits) = split32((length - MIN_MATCH) as u32);
    (LITERAL_CODES + code as usize, extra, bits)
}

/// Returns the (symbol, extra bits, number of extra bits) of a distance.
pub fn distance_symbol(distance: usize) -> (usize, u32, usize) {
    debug_assert!(distance > 0);
    let (code, extra, bits) = split32((distance - 1) as u32);
    (code as usize, extra, bits)
}

/// Writes tokens with Huffman tables that were fitted to the token stream.
pub struct TokenEncoder {
    litlen_lengths: Vec<u8>,
    dist_lengths: Vec<u8>,
    litlen: HuffmanEncoder,
    dist: HuffmanEncoder,
}

impl TokenEncoder {
    /// Count the symbols in 'tokens' and build the code tables.
    pub fn new(tokens: &[Token]) -> Self {
        let mut litlen_hist = Histogram::<LITLEN_CODES>::new();
        let mut dist_hist = Histogram::<DISTANCE_CODES>::new();

        for token in tokens {
            match *token {
                Token::Literal(byte) => litlen_hist.add(byte as usize),
                Token::Match { distance, length } => {
                    litlen_hist.add(length_symbol(length as usize).0);
                    dist_hist.add(distance_symbol(distance as usize).0);
                }
            }
        }

        // The decoder rejects empty tables, so give one code to streams
        // without literals or without matches.
        if litlen_hist.used_symbols() == 0 {
            litlen_hist.add(0);
        }
        if dist_hist.used_symbols() == 0 {
            dist_hist.add(0);
        }

        log::trace!(
            "Token tables: {} literal/length symbols, {} distance symbols",
            litlen_hist.used_symbols(),
            dist_hist.used_symbols()
        );

        let litlen_lengths = build_code_lengths(&litlen_hist);
        let dist_lengths = build_code_lengths(&dist_hist);
        Self {
            litlen: HuffmanEncoder::from_lengths(&litlen_lengths),
            dist: HuffmanEncoder::from_lengths(&dist_lengths),
            litlen_lengths,
            dist_lengths,
        }
    }

    /// Write both code tables.
    pub fn write_tables(&self, bw: &mut BitWriter) {
        write_lengths(&self.litlen_lengths, bw);
        write_lengths(&self.dist_lengths, bw);
    }

    /// Write a single token. The token must have been counted in 'new'.
    pub fn encode_token(&self, token: &Token, bw: &mut BitWriter) {
        match *token {
            Token::Literal(byte) => self.litlen.encode(byte as usize, bw),
            Token::Match { distance, length } => {
                let (sym, extra, bits) = length_symbol(length as usize);
                self.litlen.encode(sym, bw);
                bw.push_word(extra as u64, bits);
                let (sym, extra, bits) = distance_symbol(distance as usize);
                self.dist.encode(sym, bw);
                bw.push_word(extra as u64, bits);
            }
        }
    }
}

/// Write the code tables followed by all of the tokens.
pub fn encode_tokens(tokens: &[Token], bw: &mut BitWriter) {
    let encoder = TokenEncoder::new(tokens);
    encoder.write_tables(bw);
    for token in tokens {
        encoder.encode_token(token, bw);
    }
}

/// Reads the code tables and then decodes tokens one at a time.
pub struct TokenDecoder<'a> {
    br: BitReader<'a>,
    litlen: HuffmanDecoder,
    dist: HuffmanDecoder,
}

impl<'a> TokenDecoder<'a> {
    /// Load the code tables from the beginning of 'br'.
    pub fn new(mut br: BitReader<'a>) -> Result<Self> {
        let litlen = HuffmanDecoder::from_lengths(&read_lengths(
            LITLEN_CODES,
            &mut br,
        )?)?;
        let dist = HuffmanDecoder::from_lengths(&read_lengths(
            DISTANCE_CODES,
            &mut br,
        )?)?;
        if litlen.is_empty() {
            return Err(Error::corrupt("empty literal/length table"));
        }
        if dist.is_empty() {
            return Err(Error::corrupt("empty distance table"));
        }
        Ok(Self { br, litlen, dist })
    }

    /// Returns the number of bits that were not consumed yet.
    pub fn remaining_bits(&self) -> usize {
        self.br.remaining()
    }

    /// Check that nothing but the zero padding of the last byte remains.
    pub fn finish(mut self) -> Result<()> {
        let rest = self.br.remaining();
        if rest >= 8 || self.br.pop_word(rest)? != 0 {
            return Err(Error::corrupt("trailing data after the token stream"));
        }
        Ok(())
    }

    /// Decode the next token. Lengths above MAX_MATCH are rejected. The
    /// distance is only checked by the caller, who knows the window.
    pub fn next_token(&mut self) -> Result<Token> {
        let sym = self.litlen.decode(&mut self.br)?;
        if sym < LITERAL_CODES {
            return Ok(Token::Literal(sym as u8));
        }

        let code = (sym - LITERAL_CODES) as u32;
        let extra = self.br.pop_word(code as usize)? as u32;
        let length = join32(code, extra) + MIN_MATCH as u64;
        if length > MAX_MATCH as u64 {
            return Err(Error::corrupt("match length out of range"));
        }

        let code = self.dist.decode(&mut self.br)? as u32;
        let extra = self.br.pop_word(code as usize)? as u32;
        let distance = join32(code, extra) + 1;

        Ok(Token::Match {
            distance: distance as u32,
            length: length as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_ranges() {
        assert_eq!(length_symbol(MIN_MATCH), (LITERAL_CODES, 0, 0));
        assert_eq!(length_symbol(MAX_MATCH).0, LITLEN_CODES - 1);
        assert_eq!(distance_symbol(1), (0, 0, 0));
        assert_eq!(distance_symbol(1 << 24).0, DISTANCE_CODES - 1);
    }

    #[test]
    fn test_tokens_without_matches() {
        let tokens = [Token::Literal(7); 10];
        let mut bw = BitWriter::new();
        encode_tokens(&tokens, &mut bw);
        let data = bw.finish();

        let mut dec = TokenDecoder::new(BitReader::new(&data)).unwrap();
        for _ in 0..10 {
            assert_eq!(dec.next_token().unwrap(), Token::Literal(7));
        }
        assert!(dec.remaining_bits() < 8);
        assert!(dec.finish().is_ok());
    }
}
