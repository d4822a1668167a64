//! This module implements a reusable Lempel–Ziv matcher.
use std::ops::Range;

use crate::coding::hist::num_bits;
use crate::lz::{MAX_MATCH, MAX_WINDOW_LOG, MIN_MATCH};

/// Used to mark empty cells.
const EMPTY_CELL: u32 = 0xffffffff;
/// The smallest hash table (1 << x rows) that we allocate.
const MIN_DICT_BITS: u32 = 8;

/// The parameters that control the effort of the matcher.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchParams {
    /// Matches may reach back up to (1 << window_log) bytes.
    pub window_log: u8,
    /// Controls the size of the cache (1 << x rows).
    pub dict_bits: u8,
    /// Number of ways in the LRU cache. This is the number of candidates that
    /// are probed for each position. Zero disables matching.
    pub banks: usize,
    /// Controls the look ahead scan of the parser (1 is greedy).
    pub parse_search: usize,
}

impl MatchParams {
    /// Select the matcher parameters based on the compression 'level'.
    pub fn for_level(level: u8) -> Self {
        let (window_log, dict_bits, banks, parse_search) = match level {
            0 => (16, 8, 0, 1),
            1 => (16, 14, 1, 1),
            2 => (17, 15, 2, 1),
            3 => (18, 15, 4, 1),
            4 => (18, 16, 4, 2),
            5 => (19, 16, 8, 2),
            6 => (20, 16, 12, 2),
            7 => (21, 17, 16, 2),
            8 => (22, 17, 24, 3),
            _ => (MAX_WINDOW_LOG, 17, 32, 3),
        };
        Self {
            window_log,
            dict_bits,
            banks,
            parse_search,
        }
    }
}

/// Finds the longest earlier occurrence of the bytes at a given position.
/// Maps a 3-byte sequence to the most recent positions where it appeared.
/// The match could be a hash collision or an uninitialized value.
pub struct MatchFinder<'a> {
    /// The input to tokenize.
    input: &'a [u8],
    /// The search parameters.
    params: MatchParams,
    /// The number of bits in the hash index (shrunk for small inputs).
    dict_bits: u32,
    /// Rows of 'banks' positions, newest first.
    dict: Vec<u32>,
}

impl<'a> MatchFinder<'a> {
    pub fn new(input: &'a [u8], params: MatchParams) -> Self {
        let needed = num_bits(input.len().min(u32::MAX as usize) as u32);
        let dict_bits = (params.dict_bits as u32).min(needed.max(MIN_DICT_BITS));
        Self {
            input,
            params,
            dict_bits,
            dict: vec![EMPTY_CELL; (1 << dict_bits) * params.banks],
        }
    }

    /// Returns the length of the input string
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn get_bytes_at(&self, idx: usize) -> u32 {
        let b = &self.input[idx..idx + MIN_MATCH];
        (b[0] as u32) | (b[1] as u32) << 8 | (b[2] as u32) << 16
    }

    fn hash_to_index(&self, val: u32) -> usize {
        let val = val.wrapping_mul(0x797124e5);
        let val = val >> (32 - self.dict_bits);
        val as usize
    }

    /// Return True if there are enough bytes at 'idx' to hash.
    fn can_hash(&self, idx: usize) -> bool {
        self.params.banks > 0
            && idx + MIN_MATCH <= self.input.len()
            && idx < EMPTY_CELL as usize
    }

    /// Return True if we can prove that this match is not longer than the best
    /// match.
    fn early_disqualify(&self, a: usize, b: usize, best_size: usize) -> bool {
        debug_assert!(a < b, "Pointer b must come after pointer a");
        b + best_size < self.input.len()
            && self.input[a + best_size] != self.input[b + best_size]
    }

    /// Return the size of a string that starts at 'a' and 'b' indices.
    /// The index 'a' must come before 'b'. The strings may overlap.
    fn get_match_length(&self, a: usize, b: usize) -> usize {
        debug_assert!(a < b, "Pointer b must come after pointer a");
        let end = self.input.len().min(b + MAX_MATCH);
        let mut len = 0;
        while b + len < end && self.input[a + len] == self.input[b + len] {
            len += 1;
        }
        len
    }

    /// Return a match to a previous string that matches a string that starts at
    /// 'idx'. Among the probed candidates the longest match wins, and on equal
    /// lengths the nearest one, because the banks are ordered newest first.
    fn get_match(&self, idx: usize) -> Range<usize> {
        if !self.can_hash(idx) {
            return 0..0;
        }
        let banks = self.params.banks;
        let base = self.get_match_candidate(idx) * banks;
        let max_offset = 1usize << self.params.window_log;
        // The longest match that is possible from this position.
        let limit = MAX_MATCH.min(self.input.len() - idx);
        let mut best = 0..0;

        for i in 0..banks {
            let loc = self.dict[base + i];
            // Ignore empty cells.
            if loc == EMPTY_CELL {
                break;
            }
            let loc = loc as usize;
            if loc >= idx {
                continue;
            }
            // Ignore match distances that are too big.
            if idx - loc > max_offset {
                break;
            }
            if self.early_disqualify(loc, idx, best.len()) {
                continue;
            }
            let len = self.get_match_length(loc, idx);
            if best.len() < len {
                best = loc..loc + len;
                // Nothing that comes later can be strictly longer.
                if len == limit {
                    break;
                }
            }
        }

        if best.len() >= MIN_MATCH {
            best
        } else {
            0..0
        }
    }

    /// Return the longest earlier occurrence of the bytes at 'idx' as a
    /// (distance, length) pair, or None if there is no usable match. Only
    /// positions that were registered with 'insert' are considered.
    pub fn find_match(&self, idx: usize) -> Option<(usize, usize)> {
        let mat = self.get_match(idx);
        if mat.is_empty() {
            return None;
        }
        Some((idx - mat.start, mat.len()))
    }

    /// Register the position 'idx' as a future match source.
    pub fn insert(&mut self, idx: usize) {
        self.save_match(idx)
    }

    /// Return a possible match candidate for a string that starts at 'idx'.
    fn get_match_candidate(&self, idx: usize) -> usize {
        self.hash_to_index(self.get_bytes_at(idx))
    }

    /// Save the value at index 'idx' to the LRU dictionary.
    fn save_match(&mut self, idx: usize) {
        if !self.can_hash(idx) {
            return;
        }
        let banks = self.params.banks;
        let dic_idx = self.get_match_candidate(idx);
        // This is an LRU cache. Move the old entries to make room to the new
        // entry.
        let base = dic_idx * banks;
        self.dict.copy_within(base..base + banks - 1, base + 1);
        self.dict[base] = idx as u32;
    }

    /// Grow the match region backwards into the literal section.
    /// This is necessary because an earlier match may fail because
    /// of a hash collision or a match that's too short.
    /// Returns the number of bytes that can be removed from the literal region.
    fn grow_match_backwards(
        &self,
        lit: &Range<usize>,
        mat: &Range<usize>,
    ) -> usize {
        if mat.is_empty() || lit.is_empty() {
            return 0;
        }
        let room = MAX_MATCH - mat.len();
        let mut i = 0;
        while i < lit.len()
            && i < mat.start
            && i < room
            && self.input[mat.start - 1 - i] == self.input[lit.end - 1 - i]
        {
            i += 1;
        }
        i
    }
}

/// A Lempel–Ziv based matcher. It performs parsing with a lookahead window of
/// 'parse_search' items.
pub struct Matcher<'a> {
    /// The input to tokenize.
    dict: MatchFinder<'a>,
    /// The iterator location in the input.
    cursor: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(input: &'a [u8], params: MatchParams) -> Self {
        Self {
            dict: MatchFinder::new(input, params),
            cursor: 0,
        }
    }

    /// Return the next literal and match regions, which could be empty.
    /// The indices in the regions are absolute from the beginning of the
    /// stream. The match region is the source of the copy, and the copy is
    /// placed right after the literal region.
    fn get_next_match_region(
        &mut self,
    ) -> Option<(Range<usize>, Range<usize>)> {
        // Grow the literal section, and on each step look for a previous match.
        let mut lit = self.cursor..self.cursor;
        let input_len = self.dict.len();
        if self.cursor == input_len {
            return None;
        }
        let parse_search = self.dict.params.parse_search;

        // For each character in the input buffer:
        'outer: while self.cursor + MIN_MATCH <= input_len {
            // Check if there is a previous match, and save the hash.
            let mat = self.dict.get_match(self.cursor);
            self.dict.save_match(self.cursor);

            if !mat.is_empty() {
                // If we found a match, try to see if one of the next chars is a
                // better candidate. Enable a form of non-greedy parsing.
                // Explanation:
                // http://fastcompression.blogspot.com/2011/12/advanced-parsing-strategies.html
                for i in 1..parse_search {
                    let mat2 = self.dict.get_match(self.cursor + i);
                    // Check if by skipping 'i' characters we get a better
                    // match. If we do, construct literals and jump forward.
                    if !mat2.is_empty() && mat2.len() >= mat.len() + i {
                        for j in 1..i {
                            self.dict.save_match(self.cursor + j);
                        }
                        self.cursor += i;
                        lit = lit.start..lit.end + i;
                        continue 'outer;
                    }
                }

                // Try to increase the size of the match backwards and take from
                // the literals.
                let reduce = self.dict.grow_match_backwards(&lit, &mat);

                // Insert all of the hashes in the matched region into the
                // dictionary.
                for i in self.cursor + 1..self.cursor + mat.len() {
                    self.dict.save_match(i);
                }

                // Update the cursor and return the match.
                self.cursor += mat.len();
                let mat = mat.start - reduce..mat.end;
                lit = lit.start..lit.end - reduce;
                return Some((lit, mat));
            }

            // We didn't find a match. Grow the literal region and move on.
            self.cursor += 1;
            lit = lit.start..lit.end + 1;
        }

        // We are close to the end of the buffer. Grow the literal section.
        self.cursor = input_len;
        lit = lit.start..input_len;

        Some((lit, 0..0))
    }
}

/// Implement the iterator trait for the matcher.
impl<'a> Iterator for Matcher<'a> {
    type Item = (Range<usize>, Range<usize>);

    fn next(&mut self) -> Option<(Range<usize>, Range<usize>)> {
        self.get_next_match_region()
    }
}

/// Build a matcher for 'input' with the parameters 'params'.
/// Returns an iterator that iterates over the literal and match regions.
pub fn select_matcher(params: MatchParams, input: &[u8]) -> Matcher<'_> {
    Matcher::new(input, params)
}
