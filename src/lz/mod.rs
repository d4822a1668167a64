//! A collection of modules that implement Lempel–Ziv matching.

pub mod matcher;

use crate::error::Result;
use matcher::{select_matcher, MatchParams};

/// The shortest back-reference that the matcher emits.
pub const MIN_MATCH: usize = 3;
/// The longest back-reference that the matcher emits.
pub const MAX_MATCH: usize = 1 << 16;
/// The range of window sizes (1 << log) that a coded block may declare.
pub const MIN_WINDOW_LOG: u8 = 10;
pub const MAX_WINDOW_LOG: u8 = 24;

/// An element of the token stream that connects the matcher and the entropy
/// coder. Replaying the tokens against the output reconstructs the input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A single byte that is copied to the output.
    Literal(u8),
    /// Copy 'length' bytes that start 'distance' bytes back in the output.
    Match { distance: u32, length: u32 },
}

impl Token {
    /// Returns the number of output bytes that the token produces.
    pub fn output_len(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length as usize,
        }
    }
}

/// Run the matcher over the whole input and return the token stream.
pub fn tokenize(input: &[u8], params: MatchParams) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    // Most inputs that are worth coding produce far fewer tokens than bytes.
    tokens.try_reserve(input.len() / 4)?;

    for (lit, mat) in select_matcher(params, input) {
        for &byte in &input[lit.clone()] {
            tokens.push(Token::Literal(byte));
        }
        // Empty matches show up at the end of the stream.
        if !mat.is_empty() {
            let distance = lit.end - mat.start;
            tokens.push(Token::Match {
                distance: distance as u32,
                length: mat.len() as u32,
            });
        }
    }
    Ok(tokens)
}
