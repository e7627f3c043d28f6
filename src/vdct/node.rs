//! Mutable arena node for the value-dereferenced variant.

/// A node in the mutable (pre-compilation) VDCT trie.
///
/// Edges are single key bytes; `value_ref` is the offset of this node's
/// value within the value table, set only when a key terminates here.
pub(crate) struct VdctNode {
    pub edges: Vec<(u8, usize)>,
    pub value_ref: Option<u32>,
    pub is_prefix_end: bool,
}

impl VdctNode {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            value_ref: None,
            is_prefix_end: false,
        }
    }

    /// Binary search for the child reached by `byte`.
    pub fn get_child(&self, byte: u8) -> Option<usize> {
        self.edges
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| self.edges[i].1)
    }

    /// Inserts or updates the edge for `byte`, keeping `edges` sorted.
    pub fn add_child(&mut self, byte: u8, child: usize) {
        match self.edges.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(i) => self.edges[i].1 = child,
            Err(i) => self.edges.insert(i, (byte, child)),
        }
    }
}

impl Default for VdctNode {
    fn default() -> Self {
        Self::new()
    }
}
