//! Static Huffman Compression
//!
//! Compressed data is self-describing: a header carries the frequency of every
//! byte that occurs, the decoder rebuilds the same tree from it, so no tree
//! shape is stored.
//!
//! * This transforms buffers, not streams (the whole input is held in memory)
//! * All header integers are big endian
//!
//! Layout, version 1:
//! ```text
//! "HUF" 0x01          4 bytes
//! symbol count N      u16, 0..=256
//! N entries           u8 byte value + u32 frequency, ascending byte value
//! encoded bit count   u64
//! payload             ceil(bits/8) bytes, MSB first, zero padded
//! ```
//! The end of data is found from the sum of frequencies, there is no end-of-stream symbol.
//! Empty input gives a header with N=0 and no payload.

use std::io::{Cursor,Read,Write,Seek,SeekFrom,ErrorKind};
use crate::tools::frequency::FrequencyTable;
use crate::tools::huff_tree::HuffmanTree;
use crate::tools::code_table::CodeTable;
use crate::tools::bits::{BitWriter,BitReader};
use crate::{DYNERR,Error};

pub const MAGIC: [u8;4] = [b'H',b'U',b'F',1];
const MAX_SYMBOLS: usize = 256;
const HEADER_MIN: usize = 14;

/// Options controlling compression
#[derive(Clone)]
pub struct Options {
    /// starting position in the input file
    pub in_offset: u64,
    /// starting position in the output file
    pub out_offset: u64,
    /// return error if input is larger, cannot usefully exceed `u32::MAX`
    pub max_file_size: u64
}

pub const STD_OPTIONS: Options = Options {
    in_offset: 0,
    out_offset: 0,
    max_file_size: u32::MAX as u64
};

/// The header of a `.huf` buffer
#[derive(Debug,PartialEq)]
pub struct Header {
    pub freq: FrequencyTable,
    /// number of payload bits, excluding padding
    pub bit_count: u64
}

/// take `n` bytes at `ptr` and advance
fn take<'a>(dat: &'a [u8],ptr: &mut usize,n: usize) -> Result<&'a [u8],Error> {
    if dat.len() < *ptr + n {
        log::error!("header ends at {}, needed {} more bytes at {}",dat.len(),n,*ptr);
        return Err(Error::TruncatedStream);
    }
    let ans = &dat[*ptr..*ptr+n];
    *ptr += n;
    Ok(ans)
}

impl Header {
    /// number of symbols the payload decodes to
    pub fn symbol_count(&self) -> u64 {
        self.freq.total()
    }
    pub fn write(&self,out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&u16::to_be_bytes(self.freq.distinct() as u16));
        for (b,count) in self.freq.iter() {
            out.push(b);
            out.extend_from_slice(&u32::to_be_bytes(count as u32));
        }
        out.extend_from_slice(&u64::to_be_bytes(self.bit_count));
    }
    /// Parse the header, returning it with the offset of the payload.
    /// This checks structure only, agreement with the payload is checked by `decode`.
    pub fn parse(dat: &[u8]) -> Result<(Self,usize),Error> {
        if dat.len() < MAGIC.len() || dat[0..MAGIC.len()] != MAGIC {
            return Err(Error::UnsupportedFormat);
        }
        let mut ptr = MAGIC.len();
        let raw = take(dat,&mut ptr,2)?;
        let n = u16::from_be_bytes([raw[0],raw[1]]) as usize;
        if n > MAX_SYMBOLS {
            log::error!("{} symbols in table",n);
            return Err(Error::CorruptHeader);
        }
        let mut entries: Vec<(u8,u64)> = Vec::with_capacity(n);
        for _i in 0..n {
            let raw = take(dat,&mut ptr,5)?;
            let b = raw[0];
            let count = u32::from_be_bytes([raw[1],raw[2],raw[3],raw[4]]) as u64;
            if count == 0 {
                log::error!("symbol {} has zero frequency",b);
                return Err(Error::CorruptHeader);
            }
            if let Some(&(prev,_)) = entries.last() {
                if b <= prev {
                    log::error!("symbol {} follows {}",b,prev);
                    return Err(Error::CorruptHeader);
                }
            }
            entries.push((b,count));
        }
        let mut raw = [0;8];
        raw.copy_from_slice(take(dat,&mut ptr,8)?);
        let header = Self {
            freq: FrequencyTable::from_entries(entries),
            bit_count: u64::from_be_bytes(raw)
        };
        log::debug!("header: {} symbols, {} bits",header.symbol_count(),header.bit_count);
        Ok((header,ptr))
    }
}

/// Compress a buffer, output is header + payload
pub fn encode(dat: &[u8]) -> Result<Vec<u8>,Error> {
    if dat.len() as u64 > u32::MAX as u64 {
        return Err(Error::FileTooLarge);
    }
    let freq = FrequencyTable::of(dat);
    log::debug!("{} distinct symbols in {} bytes",freq.distinct(),dat.len());
    log::trace!("frequencies: {:?}",freq);
    let mut ans = Vec::with_capacity(HEADER_MIN + 5*freq.distinct() + dat.len()/2);
    let tree = match HuffmanTree::build(&freq) {
        Some(tree) => tree,
        None => {
            log::debug!("empty input, header only");
            Header { freq, bit_count: 0 }.write(&mut ans);
            return Ok(ans);
        }
    };
    let codes = CodeTable::of(&tree);
    let mut writer = BitWriter::new();
    for &b in dat {
        // every byte that was counted is a leaf of the tree
        writer.push_code(codes.get(b).expect("byte has no code"));
    }
    let header = Header { freq, bit_count: writer.len() };
    header.write(&mut ans);
    let (payload,valid) = writer.finish();
    log::debug!("{} payload bytes, {} valid bits in last byte",payload.len(),valid);
    ans.extend_from_slice(&payload);
    Ok(ans)
}

/// Expand a buffer produced by `encode`.
/// Either all of the original data is returned, or an error.
pub fn decode(dat: &[u8]) -> Result<Vec<u8>,Error> {
    let (header,offset) = Header::parse(dat)?;
    let payload = &dat[offset..];
    let tree = match HuffmanTree::build(&header.freq) {
        Some(tree) => tree,
        None => {
            if header.bit_count != 0 || payload.len() > 0 {
                log::error!("no symbols, but {} bits and {} payload bytes",header.bit_count,payload.len());
                return Err(Error::CorruptHeader);
            }
            return Ok(Vec::new());
        }
    };
    let expected_bits = CodeTable::of(&tree).encoded_bits(&header.freq);
    if expected_bits != header.bit_count {
        log::error!("frequencies imply {} bits, header declares {}",expected_bits,header.bit_count);
        return Err(Error::CorruptHeader);
    }
    let mut reader = BitReader::new(payload,header.bit_count)?;
    if payload.len() as u64 > (header.bit_count + 7) / 8 {
        log::error!("{} bytes follow the payload",payload.len() as u64 - (header.bit_count + 7) / 8);
        return Err(Error::CorruptHeader);
    }
    // every symbol takes at least one bit, so the reader check bounds this allocation
    let symbols = header.symbol_count();
    let mut ans = Vec::with_capacity(symbols as usize);
    while (ans.len() as u64) < symbols {
        ans.push(tree.decode_symbol(&mut reader)?);
    }
    if reader.remaining() > 0 {
        log::error!("{} bits left after {} symbols",reader.remaining(),symbols);
        return Err(Error::CorruptHeader);
    }
    Ok(ans)
}

/// Main compression function.
/// `expanded_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let mut expanded_length = expanded_in.seek(SeekFrom::End(0))?;
    if opt.in_offset > expanded_length {
        return Err(Box::new(std::io::Error::new(ErrorKind::UnexpectedEof,"offset is beyond end of input")));
    }
    expanded_length -= opt.in_offset;
    if expanded_length > opt.max_file_size {
        return Err(Box::new(Error::FileTooLarge));
    }
    expanded_in.seek(SeekFrom::Start(opt.in_offset))?;
    let mut dat = Vec::new();
    expanded_in.read_to_end(&mut dat)?;
    let compressed = encode(&dat)?;
    compressed_out.seek(SeekFrom::Start(opt.out_offset))?;
    compressed_out.write_all(&compressed)?;
    compressed_out.flush()?;
    Ok((expanded_length,compressed.len() as u64))
}

/// Main decompression function.
/// `compressed_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.  Nothing is written if there is an error.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let mut compressed_length = compressed_in.seek(SeekFrom::End(0))?;
    if opt.in_offset > compressed_length {
        return Err(Box::new(Error::TruncatedStream));
    }
    compressed_length -= opt.in_offset;
    compressed_in.seek(SeekFrom::Start(opt.in_offset))?;
    let mut dat = Vec::new();
    compressed_in.read_to_end(&mut dat)?;
    let expanded = decode(&dat)?;
    if expanded.len() as u64 > opt.max_file_size {
        return Err(Box::new(Error::FileTooLarge));
    }
    expanded_out.seek(SeekFrom::Start(opt.out_offset))?;
    expanded_out.write_all(&expanded)?;
    expanded_out.flush()?;
    Ok((compressed_length,expanded.len() as u64))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

// *************** TESTS *****************

#[cfg(test)]
fn hex_bytes(s: &str) -> Vec<u8> {
    hex::decode(s.replace(" ","")).unwrap()
}

#[test]
fn compression_works() {
    // b gets 0, a gets 1: 110 padded to C0
    let huf_str = "48 55 46 01 00 02 61 00 00 00 02 62 00 00 00 01 00 00 00 00 00 00 00 03 C0";
    assert_eq!(encode("aab".as_bytes()),Ok(hex_bytes(huf_str)));
    // equal weights: c gets 0, a gets 10, b gets 11
    let huf_str = "48 55 46 01 00 03 61 00 00 00 01 62 00 00 00 01 63 00 00 00 01 00 00 00 00 00 00 00 05 B0";
    assert_eq!(encode("abc".as_bytes()),Ok(hex_bytes(huf_str)));
}

#[test]
fn single_symbol() {
    let dat = [0x41;5];
    let huf_str = "48 55 46 01 00 01 41 00 00 00 05 00 00 00 00 00 00 00 05 00";
    let compressed = encode(&dat).expect("compression failed");
    assert_eq!(compressed,hex_bytes(huf_str));
    assert_eq!(decode(&compressed),Ok(dat.to_vec()));
}

#[test]
fn empty_input() {
    let compressed = encode(&[]).expect("compression failed");
    assert_eq!(compressed,hex_bytes("48 55 46 01 00 00 00 00 00 00 00 00 00 00"));
    let (header,offset) = Header::parse(&compressed).expect("parse failed");
    assert_eq!(header.symbol_count(),0);
    assert_eq!(offset,compressed.len());
    assert_eq!(decode(&compressed),Ok(Vec::new()));
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data: Vec<u8> = (0..=255).chain(0..=255).chain(0..7).collect();
    let compressed = compress_slice(&test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data,expanded);

    let test_data = [0x00];
    let compressed = compress_slice(&test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn skewed_input_shrinks() {
    let mut test_data = vec![b'A';10000];
    test_data.push(b'B');
    let compressed = encode(&test_data).expect("compression failed");
    assert!(compressed.len() < test_data.len());
    let (header,offset) = Header::parse(&compressed).expect("parse failed");
    assert_eq!(header.bit_count,10001);
    assert_eq!(compressed.len() - offset,1251);
    assert_eq!(decode(&compressed),Ok(test_data));
}

#[test]
fn truncation_detected() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = encode(test_data).expect("compression failed");
    assert_eq!(decode(&compressed[0..compressed.len()-1]),Err(Error::TruncatedStream));
    // header cut inside the frequency table
    assert_eq!(decode(&compressed[0..9]),Err(Error::TruncatedStream));
    let empty = encode(&[]).expect("compression failed");
    assert_eq!(decode(&empty[0..empty.len()-1]),Err(Error::TruncatedStream));
    // bits run out before a leaf: 11 11 1 gives b, b, then half a code
    let huf_str = "48 55 46 01 00 03 61 00 00 00 01 62 00 00 00 01 63 00 00 00 01 00 00 00 00 00 00 00 05 F8";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::TruncatedStream));
}

#[test]
fn foreign_data_rejected() {
    assert_eq!(decode(&hex_bytes("50 4B 03 04 14 00 00 00")),Err(Error::UnsupportedFormat));
    assert_eq!(decode("HU".as_bytes()),Err(Error::UnsupportedFormat));
    assert_eq!(decode(&hex_bytes("48 55 46 02 00 00 00 00 00 00 00 00 00 00")),Err(Error::UnsupportedFormat));
}

#[test]
fn corrupt_headers_rejected() {
    // 257 symbols
    assert_eq!(decode(&hex_bytes("48 55 46 01 01 01")),Err(Error::CorruptHeader));
    // symbols out of order
    let huf_str = "48 55 46 01 00 02 62 00 00 00 01 61 00 00 00 02 00 00 00 00 00 00 00 03 C0";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::CorruptHeader));
    // zero frequency
    let huf_str = "48 55 46 01 00 01 41 00 00 00 00 00 00 00 00 00 00 00 00";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::CorruptHeader));
    // bit count disagrees with frequencies
    let huf_str = "48 55 46 01 00 02 61 00 00 00 02 62 00 00 00 01 00 00 00 00 00 00 00 04 C0";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::CorruptHeader));
    // trailing byte after the payload
    let huf_str = "48 55 46 01 00 02 61 00 00 00 02 62 00 00 00 01 00 00 00 00 00 00 00 03 C0 00";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::CorruptHeader));
    // no symbols but a payload
    let huf_str = "48 55 46 01 00 00 00 00 00 00 00 00 00 08 FF";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::CorruptHeader));
    // 0 0 0 decodes c c c with two bits to spare
    let huf_str = "48 55 46 01 00 03 61 00 00 00 01 62 00 00 00 01 63 00 00 00 01 00 00 00 00 00 00 00 05 00";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::CorruptHeader));
}

#[test]
fn dead_end_code() {
    // single symbol tree only has a left branch, fifth bit is 1
    let huf_str = "48 55 46 01 00 01 41 00 00 00 05 00 00 00 00 00 00 00 05 08";
    assert_eq!(decode(&hex_bytes(huf_str)),Err(Error::DeadEndCode));
}

#[test]
fn offsets_and_limits() {
    let test_data = "XXXXabracadabra".as_bytes();
    let opt = Options {
        in_offset: 4,
        out_offset: 2,
        max_file_size: 100
    };
    let compressed = compress_slice(test_data,&opt).expect("compression failed");
    assert_eq!(compressed[0..2],[0,0]);
    assert_eq!(compressed[2..],encode("abracadabra".as_bytes()).expect("compression failed"));
    let opt = Options {
        in_offset: 2,
        out_offset: 0,
        max_file_size: 100
    };
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(expanded,"abracadabra".as_bytes());

    let opt = Options {
        in_offset: 0,
        out_offset: 0,
        max_file_size: 10
    };
    let err = compress_slice(test_data,&opt).expect_err("size limit ignored");
    assert_eq!(err.downcast_ref::<Error>(),Some(&Error::FileTooLarge));
}
