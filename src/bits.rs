//! Bit-level readers and writers. Bits are packed LSB-first: the first bit
//! that is pushed lands in the lowest bit of the first byte.

use crate::error::{Error, Result};

/// The widest exp-Golomb prefix that the reader accepts (32bit values).
const MAX_VARINT_CODE: usize = 32;

/// Accumulates bits into a growable byte buffer.
#[derive(PartialEq, Debug)]
pub struct BitWriter {
    /// Stores the bytes that were flushed.
    data: Vec<u8>,
    /// Stores the pending bits, packed to the right [xxxxx543210].
    /// Holds 0..7 bits between calls. Bits above 'used' are zero.
    last: u64,
    /// Number of valid bits in 'last'.
    used: usize,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter {
            data: Vec::new(),
            last: 0,
            used: 0,
        }
    }

    /// Set all of the bits above 'keep' to zero.
    pub fn clear_upper_bits(bits: u64, keep: usize) -> u64 {
        if keep == 0 {
            return 0;
        }
        let amt: u32 = (64 - keep) as u32;
        let shl = bits.overflowing_shl(amt).0;
        shl.overflowing_shr(amt).0
    }

    fn verify(&self) {
        debug_assert!(self.used < 8);
        debug_assert!(self.last == Self::clear_upper_bits(self.last, self.used));
    }

    /// Push the lowest 'num' bits from 'bits'.
    pub fn push_word(&mut self, bits: u64, num: usize) {
        debug_assert!(num <= 64, "Pushing too many bits");
        // The pending word holds at most 7 bits, so split wide writes to keep
        // everything within 64 bits.
        if num > 56 {
            self.push_word(bits, 32);
            self.push_word(bits >> 32, num - 32);
            return;
        }

        let bits = Self::clear_upper_bits(bits, num);
        self.last |= bits << self.used;
        self.used += num;

        // Flush the full bytes.
        while self.used >= 8 {
            self.data.push(self.last as u8);
            self.last >>= 8;
            self.used -= 8;
        }
        self.verify();
    }

    /// Push a single bit.
    pub fn push_bit(&mut self, bit: bool) {
        self.push_word(bit as u64, 1);
    }

    /// Push a variable-length number. The width of the number is written in
    /// unary (ones terminated by a zero), followed by the low bits of the
    /// number. The value is biased by one to allow the encoding of zero.
    pub fn push_varint(&mut self, val: u32) {
        let val = val as u64 + 1;
        let code = 63 - val.leading_zeros() as usize;
        // Write the unary prefix, one bit at a time for wide codes.
        for _ in 0..code {
            self.push_bit(true);
        }
        self.push_bit(false);
        self.push_word(val, code);
    }

    /// Returns the number of bits that were written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() * 8 + self.used
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pad the last byte with zeros and return the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            self.data.push(self.last as u8);
        }
        self.data
    }
}

/// Reads bits from a fixed buffer, tracking a bit cursor.
pub struct BitReader<'a> {
    /// The packed bits.
    data: &'a [u8],
    /// Points to the next bit to read.
    cursor: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    /// Returns the number of bits that were not read yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.cursor
    }

    /// Returns the number of bits that were consumed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Read 'num' bits. The first bit read is the lowest bit of the result.
    pub fn pop_word(&mut self, num: usize) -> Result<u64> {
        debug_assert!(num <= 64, "Taking too many bits");
        if self.remaining() < num {
            return Err(Error::UnexpectedEndOfStream);
        }

        let mut val: u64 = 0;
        let mut done = 0;
        while done < num {
            let byte = self.data[self.cursor / 8] as u64;
            let offset = self.cursor % 8;
            let take = (8 - offset).min(num - done);
            let bits = BitWriter::clear_upper_bits(byte >> offset, take);
            val |= bits << done;
            done += take;
            self.cursor += take;
        }
        Ok(val)
    }

    /// Read a single bit.
    pub fn pop_bit(&mut self) -> Result<bool> {
        Ok(self.pop_word(1)? == 1)
    }

    /// Read a number that was written with 'push_varint'.
    pub fn pop_varint(&mut self) -> Result<u32> {
        let mut code = 0;
        while self.pop_bit()? {
            code += 1;
            if code > MAX_VARINT_CODE {
                return Err(Error::corrupt("variable-length number too wide"));
            }
        }
        let low = self.pop_word(code)?;
        let val = (1u64 << code) + low - 1;
        u32::try_from(val)
            .map_err(|_| Error::corrupt("variable-length number overflows"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_upper_bits() {
        assert_eq!(BitWriter::clear_upper_bits(0xff, 0), 0);
        assert_eq!(BitWriter::clear_upper_bits(0xff, 4), 0xf);
        assert_eq!(BitWriter::clear_upper_bits(u64::MAX, 64), u64::MAX);
    }

    #[test]
    fn test_bit_order() {
        let mut bw = BitWriter::new();
        bw.push_bit(true);
        bw.push_word(0b10, 2);
        bw.push_word(0x1f, 5);
        bw.push_bit(true);
        assert_eq!(bw.len(), 9);
        assert_eq!(bw.finish(), vec![0b1111_1101, 0b1]);
    }

    #[test]
    fn test_wide_words() {
        let mut bw = BitWriter::new();
        bw.push_word(1, 3);
        bw.push_word(0xdead_beef_cafe_f00d, 64);
        bw.push_word(0x1234_5678_9abc, 61);
        let data = bw.finish();
        assert_eq!(data.len(), (3 + 64 + 61 + 7) / 8);

        let mut br = BitReader::new(&data);
        assert_eq!(br.pop_word(3).unwrap(), 1);
        assert_eq!(br.pop_word(64).unwrap(), 0xdead_beef_cafe_f00d);
        assert_eq!(br.pop_word(61).unwrap(), 0x1234_5678_9abc);
        assert!(br.remaining() < 8);
    }
}
