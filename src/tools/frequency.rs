//! Byte frequency counting.

use std::fmt;

/// Occurrence count for each of the 256 byte values.
/// Built once per buffer, then only read.
#[derive(Clone,PartialEq)]
pub struct FrequencyTable {
    counts: [u64;256]
}

impl FrequencyTable {
    /// Count the bytes in `dat`
    pub fn of(dat: &[u8]) -> Self {
        let mut counts = [0;256];
        for &b in dat {
            counts[b as usize] += 1;
        }
        Self { counts }
    }
    /// Build from (byte,count) pairs, as read back from a header.
    /// Repeated bytes accumulate.
    pub fn from_entries<I: IntoIterator<Item=(u8,u64)>>(entries: I) -> Self {
        let mut counts = [0;256];
        for (b,count) in entries {
            counts[b as usize] += count;
        }
        Self { counts }
    }
    pub fn get(&self,b: u8) -> u64 {
        self.counts[b as usize]
    }
    /// (byte,count) for bytes that occur at least once, ascending byte value
    pub fn iter(&self) -> impl Iterator<Item=(u8,u64)> + '_ {
        self.counts.iter()
            .enumerate()
            .filter(|(_,count)| **count > 0)
            .map(|(b,&count)| (b as u8,count))
    }
    /// number of distinct byte values present
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }
    /// sum of all counts, equals the length of the counted buffer
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[test]
fn counts_bytes() {
    let freq = FrequencyTable::of("abracadabra".as_bytes());
    assert_eq!(freq.get(b'a'),5);
    assert_eq!(freq.get(b'b'),2);
    assert_eq!(freq.get(b'r'),2);
    assert_eq!(freq.get(b'c'),1);
    assert_eq!(freq.get(b'd'),1);
    assert_eq!(freq.get(b'z'),0);
    assert_eq!(freq.distinct(),5);
    assert_eq!(freq.total(),11);
    let order: Vec<u8> = freq.iter().map(|(b,_)| b).collect();
    assert_eq!(order,"abcdr".as_bytes());
}

#[test]
fn empty_buffer() {
    let freq = FrequencyTable::of(&[]);
    assert!(freq.is_empty());
    assert_eq!(freq.total(),0);
    assert_eq!(freq.iter().count(),0);
}

#[test]
fn entries_match_counting() {
    let dat = [0u8,255,255,7,0,0];
    let freq = FrequencyTable::of(&dat);
    assert_eq!(FrequencyTable::from_entries(freq.iter()),freq);
    assert_eq!(freq.total(),dat.len() as u64);
}
