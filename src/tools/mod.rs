//! Building blocks of the static Huffman codec.
//! These work on in-memory buffers and know nothing about files.

pub mod frequency;
pub mod huff_tree;
pub mod code_table;
pub mod bits;
