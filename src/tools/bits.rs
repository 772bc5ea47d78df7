//! Bit packing for the payload, most significant bit first within each byte.
//! The `bit_vec` crate already uses this ordering for `from_bytes` and `to_bytes`.

use bit_vec::BitVec;
use crate::Error;

pub struct BitWriter {
    bits: BitVec
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            bits: BitVec::new()
        }
    }
    pub fn push(&mut self,bit: bool) {
        self.bits.push(bit);
    }
    pub fn push_code(&mut self,code: &BitVec) {
        for bit in code.iter() {
            self.bits.push(bit);
        }
    }
    /// number of bits written so far
    pub fn len(&self) -> u64 {
        self.bits.len() as u64
    }
    /// Returns the packed bytes, and the number of valid bits in the last byte.
    /// The remaining bits of the last byte are zero.  An empty writer gives (\[\],0).
    pub fn finish(self) -> (Vec<u8>,u8) {
        let valid = match self.bits.len() % 8 {
            0 if self.bits.len() > 0 => 8,
            rem => rem as u8
        };
        (self.bits.to_bytes(),valid)
    }
}

/// Yields exactly `bit_count` bits from a byte buffer, trailing pad bits are never seen.
pub struct BitReader {
    bits: BitVec,
    ptr: usize,
    end: usize
}

impl BitReader {
    /// Fails with `TruncatedStream` if `dat` holds fewer than `bit_count` bits
    pub fn new(dat: &[u8],bit_count: u64) -> Result<Self,Error> {
        let available = dat.len() as u64 * 8;
        if bit_count > available {
            log::error!("need {} bits, only {} available",bit_count,available);
            return Err(Error::TruncatedStream);
        }
        Ok(Self {
            bits: BitVec::from_bytes(dat),
            ptr: 0,
            end: bit_count as usize
        })
    }
    pub fn remaining(&self) -> usize {
        self.end - self.ptr
    }
}

impl Iterator for BitReader {
    type Item = bool;
    fn next(&mut self) -> Option<bool> {
        if self.ptr >= self.end {
            return None;
        }
        let bit = self.bits.get(self.ptr);
        self.ptr += 1;
        bit
    }
}

#[test]
fn msb_first() {
    let mut writer = BitWriter::new();
    for bit in [true,false,true,true,false,false,false,false,true] {
        writer.push(bit);
    }
    assert_eq!(writer.len(),9);
    let (bytes,valid) = writer.finish();
    assert_eq!(bytes,vec![0xb0,0x80]);
    assert_eq!(valid,1);
}

#[test]
fn full_and_empty_last_byte() {
    let mut writer = BitWriter::new();
    writer.push_code(&BitVec::from_bytes(&[0x5a]));
    assert_eq!(writer.finish(),(vec![0x5a],8));
    assert_eq!(BitWriter::new().finish(),(vec![],0));
}

#[test]
fn reader_stops_at_declared_count() {
    let mut reader = BitReader::new(&[0xb0,0xff],9).expect("reader failed");
    assert_eq!(reader.remaining(),9);
    let bits: Vec<bool> = reader.by_ref().collect();
    assert_eq!(bits,vec![true,false,true,true,false,false,false,false,true]);
    assert_eq!(reader.remaining(),0);
    assert_eq!(reader.next(),None);
}

#[test]
fn reader_detects_truncation() {
    assert_eq!(BitReader::new(&[0xff],9).err(),Some(Error::TruncatedStream));
    assert!(BitReader::new(&[],0).is_ok());
}
