//! # Huffman compression with format conversions
//!
//! The `huff` module is the codec: a static Huffman coder whose `.huf` output
//! carries its own frequency table, so expansion needs nothing but the file.
//! The `container` and `convert` modules are thin wrappers that move codec
//! output into or out of a ZIP archive, or out to plain text.

pub mod tools;
pub mod huff;
pub mod container;
pub mod convert;

type DYNERR = Box<dyn std::error::Error>;

/// Codec and conversion errors
#[derive(thiserror::Error,Debug,PartialEq)]
pub enum Error {
    #[error("unsupported format: not a huf version 1 file")]
    UnsupportedFormat,
    #[error("corrupt header")]
    CorruptHeader,
    #[error("truncated stream")]
    TruncatedStream,
    #[error("code leads to an empty branch")]
    DeadEndCode,
    #[error("file too large")]
    FileTooLarge,
    #[error("no matching entry in archive")]
    EntryNotFound,
    #[error("data is not UTF-8 text")]
    NotText
}
