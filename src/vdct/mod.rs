//! VDCT — Value-Dereferenced Compiled Trie.
//!
//! Keys are stored as a compact packed trie; values live in a separate
//! interned table, and trie node records carry only a lightweight offset
//! into that table. Best suited for workloads with many repeated or
//! bulky values.

mod builder;
mod node;
mod reader;

use crate::bytes::ByteString;
use crate::error::DictResult;
use builder::ValueTable;
use node::VdctNode;

pub(crate) struct VdctBuilder {
    arena: Vec<VdctNode>,
    root: usize,
    values: ValueTable,
}

impl VdctBuilder {
    pub fn new() -> Self {
        Self {
            arena: vec![VdctNode::new()],
            root: 0,
            values: ValueTable::new(),
        }
    }

    /// Inserts `key -> value`, creating any missing path nodes. A
    /// repeated key silently overwrites its prior value and prefix flag.
    pub fn insert(&mut self, key: &[u8], value: &ByteString, as_prefix: bool) {
        let mut idx = self.root;
        for &byte in key {
            idx = match self.arena[idx].get_child(byte) {
                Some(child) => child,
                None => {
                    let new_idx = self.arena.len();
                    self.arena.push(VdctNode::new());
                    self.arena[idx].add_child(byte, new_idx);
                    new_idx
                }
            };
        }
        let value_ref = self.values.intern(value);
        self.arena[idx].value_ref = Some(value_ref);
        self.arena[idx].is_prefix_end = as_prefix;
    }

    /// Compiles the builder's state into an immutable packed buffer.
    pub fn compile(&self) -> DictResult<Vec<u8>> {
        builder::compile(&self.arena, self.root, &self.values)
    }

    /// Number of nodes in the pre-compile arena, for instrumentation.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

impl Default for VdctBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the root node offset out of a compiled buffer's header.
pub(crate) fn read_root_offset(bytes: &[u8]) -> DictResult<usize> {
    reader::read_root_offset(bytes)
}

/// Looks up `key` in a compiled buffer.
pub(crate) fn lookup(bytes: &[u8], root: usize, key: &[u8]) -> DictResult<Option<ByteString>> {
    reader::lookup(bytes, root, key)
}
