//! Code table, derived from a `HuffmanTree` by depth first traversal.
//! Left edges append 0, right edges append 1, the path to a leaf is its code.

use bit_vec::BitVec;
use super::frequency::FrequencyTable;
use super::huff_tree::{HuffmanTree,Node};

pub struct CodeTable {
    /// indexed by byte value, `None` for bytes that are not in the tree
    codes: Vec<Option<BitVec>>
}

impl CodeTable {
    pub fn of(tree: &HuffmanTree) -> Self {
        let mut this = Self {
            codes: vec![None;256]
        };
        let mut path = BitVec::new();
        this.apply(tree,tree.root(),&mut path);
        this
    }
    fn apply(&mut self,tree: &HuffmanTree,idx: usize,path: &mut BitVec) {
        match tree.node(idx) {
            Node::Leaf { symbol, .. } => {
                self.codes[*symbol as usize] = Some(path.clone());
            },
            Node::Branch { left, right, .. } => {
                path.push(false);
                self.apply(tree,*left,path);
                path.pop();
                if let Some(right) = right {
                    path.push(true);
                    self.apply(tree,*right,path);
                    path.pop();
                }
            }
        }
    }
    pub fn get(&self,b: u8) -> Option<&BitVec> {
        self.codes[b as usize].as_ref()
    }
    /// length of the code for `b`, 0 if `b` has no code
    pub fn code_len(&self,b: u8) -> usize {
        self.get(b).map_or(0,|code| code.len())
    }
    /// (byte,code) in ascending byte order
    pub fn iter(&self) -> impl Iterator<Item=(u8,&BitVec)> + '_ {
        self.codes.iter()
            .enumerate()
            .filter_map(|(b,code)| code.as_ref().map(|c| (b as u8,c)))
    }
    /// Bits needed to encode a buffer with these frequencies.
    /// Bytes without a code contribute nothing.
    pub fn encoded_bits(&self,freq: &FrequencyTable) -> u64 {
        freq.iter().map(|(b,count)| count * self.code_len(b) as u64).sum()
    }
}

#[cfg(test)]
fn code_str(table: &CodeTable,b: u8) -> String {
    table.get(b).expect("missing code").iter().map(|bit| if bit { '1' } else { '0' }).collect()
}

#[test]
fn edge_convention() {
    let tree = HuffmanTree::build(&FrequencyTable::of("abc".as_bytes())).expect("no tree");
    let table = CodeTable::of(&tree);
    assert_eq!(code_str(&table,b'c'),"0");
    assert_eq!(code_str(&table,b'a'),"10");
    assert_eq!(code_str(&table,b'b'),"11");
    assert!(table.get(b'd').is_none());
    assert_eq!(table.iter().count(),3);
}

#[test]
fn single_symbol_gets_one_bit() {
    let freq = FrequencyTable::of(&[0x41;5]);
    let tree = HuffmanTree::build(&freq).expect("no tree");
    let table = CodeTable::of(&tree);
    assert_eq!(code_str(&table,0x41),"0");
    assert_eq!(table.encoded_bits(&freq),5);
}

#[test]
fn skewed_input_is_short() {
    let mut dat = vec![b'A';10000];
    dat.push(b'B');
    let freq = FrequencyTable::of(&dat);
    let table = CodeTable::of(&HuffmanTree::build(&freq).expect("no tree"));
    assert_eq!(table.code_len(b'A'),1);
    assert_eq!(table.code_len(b'B'),1);
    assert_eq!(table.encoded_bits(&freq),10001);
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;
    use super::*;

    fn is_prefix(short: &BitVec,long: &BitVec) -> bool {
        short.len() <= long.len() && short.iter().zip(long.iter()).all(|(a,b)| a==b)
    }

    proptest! {
        #[test]
        fn codes_are_prefix_free(dat in proptest::collection::vec(any::<u8>(),1..2000)) {
            let freq = FrequencyTable::of(&dat);
            let table = CodeTable::of(&HuffmanTree::build(&freq).expect("no tree"));
            prop_assert_eq!(table.iter().count(),freq.distinct());
            for (b1,c1) in table.iter() {
                prop_assert!(c1.len() > 0);
                for (b2,c2) in table.iter() {
                    if b1 != b2 {
                        prop_assert!(!is_prefix(c1,c2));
                    }
                }
            }
        }

        #[test]
        fn same_tree_same_table(dat in proptest::collection::vec(any::<u8>(),1..500)) {
            let freq = FrequencyTable::of(&dat);
            let t1 = CodeTable::of(&HuffmanTree::build(&freq).expect("no tree"));
            let t2 = CodeTable::of(&HuffmanTree::build(&freq).expect("no tree"));
            prop_assert!(t1.iter().eq(t2.iter()));
        }
    }
}
