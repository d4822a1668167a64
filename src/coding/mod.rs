//! This module contains the entropy coding layer (histograms, Huffman tables,
//! and the token coder).

pub mod entropy;
pub mod hist;
pub mod huffman;
