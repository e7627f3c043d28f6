//! Mutable arena node for the value-prefixed variant.

use crate::bytes::ByteString;

/// A node in the mutable (pre-compilation) VPFST trie.
///
/// Unlike VDCT, there is no separate value table: each node carries its
/// own fragment of whichever values pass through it, distributed during
/// insertion so that every node's `value` is the longest common prefix
/// of all full values reachable beneath it.
///
/// `value` is `None` until the node has been visited by `distribute` or
/// received a pushdown from its parent, and `Some` (possibly an empty
/// `ByteString`) from then on. The distinction matters: a node can be
/// legitimately committed to an empty value (because an ancestor
/// absorbed the whole remainder for an earlier, shorter key) before it
/// is ever visited as the current node of an insertion walk, and that
/// commitment must not be mistaken for "unvisited, free to adopt
/// whatever remainder arrives next."
pub(crate) struct VpfstNode {
    pub edges: Vec<(u8, usize)>,
    pub value: Option<ByteString>,
    pub is_key_end: bool,
    pub is_prefix_end: bool,
    pub depth: u32,
    pub input_byte: u8,
}

impl VpfstNode {
    pub fn root() -> Self {
        Self {
            edges: Vec::new(),
            value: None,
            is_key_end: false,
            is_prefix_end: false,
            depth: 0,
            input_byte: 0,
        }
    }

    pub fn new_child(depth: u32, input_byte: u8) -> Self {
        Self {
            edges: Vec::new(),
            value: None,
            is_key_end: false,
            is_prefix_end: false,
            depth,
            input_byte,
        }
    }

    pub fn get_child(&self, byte: u8) -> Option<usize> {
        self.edges
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| self.edges[i].1)
    }

    pub fn add_child(&mut self, byte: u8, child: usize) {
        match self.edges.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(i) => self.edges[i].1 = child,
            Err(i) => self.edges.insert(i, (byte, child)),
        }
    }
}
