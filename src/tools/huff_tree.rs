//! Static Huffman tree.
//!
//! The tree is held in an arena, nodes refer to their sons by index, and the
//! tree owns every node.  Construction is deterministic: the priority queue is
//! ordered by (weight, order key), where a leaf's key is its byte value and a
//! branch's key is 256 plus the number of branches created before it.  The
//! first node taken from the queue becomes the left son (bit 0), the second
//! becomes the right son (bit 1).

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use super::frequency::FrequencyTable;
use crate::Error;

/// order keys of branches start here, above every byte value
const BRANCH_KEY: usize = 256;

#[derive(Clone,Debug,PartialEq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64
    },
    /// `right` is only `None` for the root of a single symbol tree
    Branch {
        weight: u64,
        left: usize,
        right: Option<usize>
    }
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Branch { weight, .. } => weight
        }
    }
}

#[derive(Clone,Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize
}

impl HuffmanTree {
    /// Build the tree for the given frequencies, returns `None` if the table is empty.
    /// The root is always a branch, so every symbol gets a code of at least one bit.
    pub fn build(freq: &FrequencyTable) -> Option<Self> {
        let mut nodes: Vec<Node> = Vec::new();
        // min-heap on (weight, order key, node index), keys are unique so the index never decides
        let mut queue = BinaryHeap::new();
        for (symbol,weight) in freq.iter() {
            queue.push(Reverse((weight,symbol as usize,nodes.len())));
            nodes.push(Node::Leaf { symbol, weight });
        }
        if queue.len() == 1 {
            // one distinct symbol, hang it on the left of a branch with an empty right side
            let Reverse((weight,_,leaf)) = queue.pop()?;
            nodes.push(Node::Branch { weight, left: leaf, right: None });
            log::trace!("single symbol tree");
            return Some(Self { root: nodes.len() - 1, nodes });
        }
        let mut branches = 0;
        while queue.len() > 1 {
            let Reverse((left_weight,_,left)) = queue.pop()?;
            let Reverse((right_weight,_,right)) = queue.pop()?;
            let weight = left_weight + right_weight;
            queue.push(Reverse((weight,BRANCH_KEY + branches,nodes.len())));
            nodes.push(Node::Branch { weight, left, right: Some(right) });
            branches += 1;
        }
        let Reverse((_,_,root)) = queue.pop()?;
        log::trace!("tree has {} nodes",nodes.len());
        Some(Self { nodes, root })
    }
    pub fn root(&self) -> usize {
        self.root
    }
    pub fn node(&self,idx: usize) -> &Node {
        &self.nodes[idx]
    }
    /// Walk from the root, taking one bit per branch, until a leaf is reached.
    /// Running out of bits first is `TruncatedStream`.
    pub fn decode_symbol<I: Iterator<Item=bool>>(&self,bits: &mut I) -> Result<u8,Error> {
        let mut curs = self.root;
        loop {
            match &self.nodes[curs] {
                Node::Leaf { symbol, .. } => return Ok(*symbol),
                Node::Branch { left, right, .. } => {
                    curs = match bits.next() {
                        Some(false) => *left,
                        Some(true) => right.ok_or(Error::DeadEndCode)?,
                        None => return Err(Error::TruncatedStream)
                    };
                }
            }
        }
    }
}

#[cfg(test)]
fn leaf_symbol(tree: &HuffmanTree,idx: usize) -> Option<u8> {
    match tree.node(idx) {
        Node::Leaf { symbol, .. } => Some(*symbol),
        _ => None
    }
}

#[test]
fn empty_table_has_no_tree() {
    assert!(HuffmanTree::build(&FrequencyTable::of(&[])).is_none());
}

#[test]
fn single_symbol() {
    let tree = HuffmanTree::build(&FrequencyTable::of("AAAAA".as_bytes())).expect("no tree");
    match tree.node(tree.root()) {
        Node::Branch { weight, left, right } => {
            assert_eq!(*weight,5);
            assert_eq!(leaf_symbol(&tree,*left),Some(b'A'));
            assert_eq!(*right,None);
        },
        _ => panic!("root should be a branch")
    }
    let mut bits = vec![false,true].into_iter();
    assert_eq!(tree.decode_symbol(&mut bits),Ok(b'A'));
    assert_eq!(tree.decode_symbol(&mut bits),Err(Error::DeadEndCode));
}

#[test]
fn ties_break_on_symbol_then_creation() {
    // a,b,c all weigh 1: a and b merge first, then c (key 99) is taken before the new branch (key 256)
    let tree = HuffmanTree::build(&FrequencyTable::of("abc".as_bytes())).expect("no tree");
    let (left,right) = match tree.node(tree.root()) {
        Node::Branch { weight, left, right: Some(right) } => {
            assert_eq!(*weight,3);
            (*left,*right)
        },
        _ => panic!("root should be a full branch")
    };
    assert_eq!(leaf_symbol(&tree,left),Some(b'c'));
    match tree.node(right) {
        Node::Branch { left, right: Some(right), .. } => {
            assert_eq!(leaf_symbol(&tree,*left),Some(b'a'));
            assert_eq!(leaf_symbol(&tree,*right),Some(b'b'));
        },
        _ => panic!("expected branch")
    }
}

#[test]
fn root_weight_is_total() {
    let dat = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let tree = HuffmanTree::build(&FrequencyTable::of(dat)).expect("no tree");
    assert_eq!(tree.node(tree.root()).weight(),dat.len() as u64);
}

#[test]
fn running_out_of_bits() {
    let tree = HuffmanTree::build(&FrequencyTable::of("abc".as_bytes())).expect("no tree");
    // `1` leads to the a/b branch, then nothing
    let mut bits = vec![true].into_iter();
    assert_eq!(tree.decode_symbol(&mut bits),Err(Error::TruncatedStream));
}
