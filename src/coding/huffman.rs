//! Canonical, length-limited Huffman codes.
//!
//! Only the code length of each symbol is transmitted. Both sides assign the
//! codes in canonical order (shorter codes first, ties broken by the symbol
//! value), so the decoder can rebuild the exact table from the lengths.
//! Reference: RFC 1951, section 3.2.2, and Mark Adler's 'puff' decoder.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bits::{BitReader, BitWriter};
use crate::coding::hist::Histogram;
use crate::error::{Error, Result};

/// The longest code that the encoder emits and the decoder accepts.
pub const MAX_CODE_LEN: usize = 15;

/// Number of bits used to serialize each code length.
const LENGTH_FIELD_BITS: usize = 4;

/// Marks the root of the tree in the parent array.
const NO_PARENT: usize = usize::MAX;

/// Compute optimal (unbounded) Huffman code lengths for 'counts'. Symbols with
/// a zero count get a zero length. A single used symbol gets a 1-bit code.
fn huffman_lengths(counts: &[u32]) -> Vec<u8> {
    let mut lengths = vec![0u8; counts.len()];
    let used: Vec<usize> = (0..counts.len()).filter(|&i| counts[i] != 0).collect();

    match used.len() {
        0 => return lengths,
        1 => {
            lengths[used[0]] = 1;
            return lengths;
        }
        _ => {}
    }

    // Leaves are nodes 0..used.len(). Internal nodes are appended after them,
    // so a parent always has a higher index than its children. Ties are broken
    // by the node index, which keeps the output deterministic.
    let mut parent: Vec<usize> = vec![NO_PARENT; used.len()];
    let mut heap = BinaryHeap::new();
    for (node, &sym) in used.iter().enumerate() {
        heap.push(Reverse((counts[sym] as u64, node)));
    }

    loop {
        let Some(Reverse((w1, n1))) = heap.pop() else { break };
        let Some(Reverse((w2, n2))) = heap.pop() else { break };
        let node = parent.len();
        parent.push(NO_PARENT);
        parent[n1] = node;
        parent[n2] = node;
        heap.push(Reverse((w1 + w2, node)));
    }

    // Walk from the root down to the leaves.
    let mut depth = vec![0u8; parent.len()];
    for node in (0..parent.len()).rev() {
        if parent[node] != NO_PARENT {
            depth[node] = depth[parent[node]] + 1;
        }
    }

    for (node, &sym) in used.iter().enumerate() {
        lengths[sym] = depth[node];
    }
    lengths
}

/// Build code lengths for the histogram, limited to 'MAX_CODE_LEN' bits.
/// When the optimal tree is too deep the counts are halved (flattening the
/// distribution) until it fits. Counts of one produce a balanced tree, so
/// this always terminates for alphabets below 2^15 symbols.
pub fn build_code_lengths<const BINS: usize>(hist: &Histogram<BINS>) -> Vec<u8> {
    let mut hist = hist.clone();
    loop {
        let lengths = huffman_lengths(hist.get_bins());
        let max = lengths.iter().copied().max().unwrap_or(0) as usize;
        if max <= MAX_CODE_LEN {
            return lengths;
        }
        log::trace!("Huffman tree depth {} is too deep, flattening", max);
        hist.halve();
    }
}

/// Assign canonical codes to the symbols, given valid code lengths. The
/// returned code of each symbol is stored MSB-aligned in the low 'len' bits.
pub fn canonical_codes(lengths: &[u8]) -> Vec<u32> {
    let mut bl_count = [0u32; MAX_CODE_LEN + 1];
    for &len in lengths {
        bl_count[len as usize] += 1;
    }
    bl_count[0] = 0;

    let mut next_code = [0u32; MAX_CODE_LEN + 1];
    let mut code = 0;
    for bits in 1..=MAX_CODE_LEN {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    let mut codes = vec![0u32; lengths.len()];
    for (sym, &len) in lengths.iter().enumerate() {
        if len != 0 {
            codes[sym] = next_code[len as usize];
            next_code[len as usize] += 1;
        }
    }
    codes
}

/// Reverse the lowest 'len' bits of 'code'.
fn reverse_bits(code: u32, len: u8) -> u32 {
    if len == 0 {
        return 0;
    }
    code.reverse_bits() >> (32 - len as u32)
}

/// Serialize the code lengths. Each length is written in 4 bits. A zero is
/// followed by a variable-length count of the zeros that come after it.
pub fn write_lengths(lengths: &[u8], bw: &mut BitWriter) {
    let mut i = 0;
    while i < lengths.len() {
        debug_assert!(lengths[i] as usize <= MAX_CODE_LEN);
        bw.push_word(lengths[i] as u64, LENGTH_FIELD_BITS);
        if lengths[i] == 0 {
            let mut run = 0;
            while i + 1 + run < lengths.len() && lengths[i + 1 + run] == 0 {
                run += 1;
            }
            bw.push_varint(run as u32);
            i += run;
        }
        i += 1;
    }
}

/// Load 'num_symbols' code lengths that were written with 'write_lengths'.
pub fn read_lengths(num_symbols: usize, br: &mut BitReader) -> Result<Vec<u8>> {
    let mut lengths = Vec::with_capacity(num_symbols);
    while lengths.len() < num_symbols {
        let len = br.pop_word(LENGTH_FIELD_BITS)? as u8;
        lengths.push(len);
        if len == 0 {
            let run = br.pop_varint()? as usize;
            if run > num_symbols - lengths.len() {
                return Err(Error::corrupt("code length run exceeds alphabet"));
            }
            lengths.resize(lengths.len() + run, 0);
        }
    }
    Ok(lengths)
}

/// Maps symbols to their (bit-reversed) canonical codes.
pub struct HuffmanEncoder {
    /// Maps each symbol to (reversed code, length).
    table: Vec<(u32, u8)>,
}

impl HuffmanEncoder {
    pub fn from_lengths(lengths: &[u8]) -> Self {
        let codes = canonical_codes(lengths);
        let table = codes
            .iter()
            .zip(lengths)
            .map(|(&code, &len)| (reverse_bits(code, len), len))
            .collect();
        Self { table }
    }

    /// Write the code of 'sym'. The code is written MSB first, which is the
    /// order in which the decoder walks the canonical table.
    pub fn encode(&self, sym: usize, bw: &mut BitWriter) {
        let (code, len) = self.table[sym];
        debug_assert!(len != 0, "Encoding a symbol without a code");
        bw.push_word(code as u64, len as usize);
    }

    /// Returns the length in bits of the code of 'sym'.
    pub fn code_len(&self, sym: usize) -> usize {
        self.table[sym].1 as usize
    }
}

/// Decodes canonical codes one bit at a time.
pub struct HuffmanDecoder {
    /// Number of codes of each length.
    counts: [u16; MAX_CODE_LEN + 1],
    /// Symbols sorted by code length and then by value.
    symbols: Vec<u16>,
}

impl HuffmanDecoder {
    /// Build the decoder from code lengths. Fails if the lengths do not form a
    /// valid prefix code. A complete code is required, except for a table with
    /// a single 1-bit code. An empty table is accepted, but nothing can be
    /// decoded with it.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let mut counts = [0u16; MAX_CODE_LEN + 1];
        for &len in lengths {
            if len as usize > MAX_CODE_LEN {
                return Err(Error::corrupt("code length too long"));
            }
            counts[len as usize] += 1;
        }
        counts[0] = 0;

        let used: usize = counts.iter().map(|&c| c as usize).sum();

        // Check that the code is not over-subscribed, and that it is complete.
        let mut left: i64 = 1;
        for &count in counts.iter().skip(1) {
            left <<= 1;
            left -= count as i64;
            if left < 0 {
                return Err(Error::corrupt("over-subscribed code table"));
            }
        }
        let single = used == 1 && counts[1] == 1;
        if left > 0 && used != 0 && !single {
            return Err(Error::corrupt("incomplete code table"));
        }

        let mut symbols = Vec::with_capacity(used);
        for len in 1..=MAX_CODE_LEN {
            for (sym, &l) in lengths.iter().enumerate() {
                if l as usize == len {
                    symbols.push(sym as u16);
                }
            }
        }

        Ok(Self { counts, symbols })
    }

    /// Returns True if the table has no codes at all.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Read one symbol from the bitstream.
    pub fn decode(&self, br: &mut BitReader) -> Result<usize> {
        if self.is_empty() {
            return Err(Error::corrupt("symbol read from an empty code table"));
        }

        // 'code' is the code read so far, 'first' is the first code of the
        // current length, and 'index' is the position of 'first' in the
        // sorted symbol list.
        let mut code: i64 = 0;
        let mut first: i64 = 0;
        let mut index: i64 = 0;
        for len in 1..=MAX_CODE_LEN {
            code |= br.pop_bit()? as i64;
            let count = self.counts[len] as i64;
            if code >= first && code - first < count {
                return Ok(self.symbols[(index + code - first) as usize] as usize);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }
        Err(Error::corrupt("invalid Huffman code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b1, 1), 0b1);
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(1 << 14, 15), 1);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_huffman_lengths() {
        assert_eq!(huffman_lengths(&[0, 0, 0]), vec![0, 0, 0]);
        assert_eq!(huffman_lengths(&[0, 5, 0]), vec![0, 1, 0]);
        assert_eq!(huffman_lengths(&[1, 1]), vec![1, 1]);
        // One symbol dominates.
        assert_eq!(huffman_lengths(&[10, 1, 1, 0]), vec![1, 2, 2, 0]);
        assert_eq!(huffman_lengths(&[1, 1, 1, 1]), vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_rfc1951_example() {
        // The example from RFC 1951: ABCDEFGH with lengths (3,3,3,3,3,2,4,4).
        let lengths = [3, 3, 3, 3, 3, 2, 4, 4];
        let codes = canonical_codes(&lengths);
        assert_eq!(
            codes,
            vec![0b010, 0b011, 0b100, 0b101, 0b110, 0b00, 0b1110, 0b1111]
        );
    }
}
