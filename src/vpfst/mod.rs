//! VPFST — Value-Prefixed Compiled FST.
//!
//! Values are distributed along the key path itself rather than stored
//! separately: each node holds the longest common prefix of every full
//! value reachable beneath it, and compilation additionally collapses
//! structurally identical suffix subtrees (a minimal acyclic
//! transducer). Best suited for workloads where many values share
//! prefixes with each other (e.g. hierarchical codes).

mod builder;
mod node;
mod reader;

use crate::bytes::ByteString;
use crate::error::DictResult;
use node::VpfstNode;

pub(crate) struct VpfstBuilder {
    arena: Vec<VpfstNode>,
    root: usize,
}

impl VpfstBuilder {
    pub fn new() -> Self {
        Self {
            arena: vec![VpfstNode::root()],
            root: 0,
        }
    }

    /// Inserts `key -> value`, distributing `value`'s bytes along the
    /// path as the longest common prefix shared with whatever is already
    /// there at each node, pushing any excess down onto existing
    /// children before continuing.
    pub fn insert(&mut self, key: &[u8], value: ByteString, as_prefix: bool) {
        let mut idx = self.root;
        let mut remainder = value;
        for &byte in key {
            remainder = self.distribute(idx, remainder);
            idx = match self.arena[idx].get_child(byte) {
                Some(child) => child,
                None => {
                    let depth = self.arena[idx].depth + 1;
                    let new_idx = self.arena.len();
                    self.arena.push(VpfstNode::new_child(depth, byte));
                    self.arena[idx].add_child(byte, new_idx);
                    new_idx
                }
            };
        }
        let leftover = self.distribute(idx, remainder);
        let node = &mut self.arena[idx];
        let current = node.value.clone().unwrap_or_else(ByteString::empty);
        node.value = Some(current.append(&leftover));
        node.is_key_end = true;
        node.is_prefix_end = as_prefix;
    }

    /// The per-node adopt-or-split step: if `idx` has never been visited
    /// (`value` is `None`) it simply adopts `remainder` whole; otherwise
    /// — even if the committed value happens to be empty — the common
    /// prefix of `remainder` and the existing value is kept, any excess
    /// existing value is pushed down onto every child, and the remaining
    /// (unconsumed) part of `remainder` is returned to the caller.
    fn distribute(&mut self, idx: usize, remainder: ByteString) -> ByteString {
        let existing = match self.arena[idx].value.clone() {
            None => {
                self.arena[idx].value = Some(remainder);
                return ByteString::empty();
            }
            Some(existing) => existing,
        };
        let common = remainder.common_prefix(&existing);
        let pushdown = existing.suffix(common.len());
        let children: Vec<(u8, usize)> = self.arena[idx].edges.clone();
        for (_, child_idx) in children {
            let child_existing = self.arena[child_idx]
                .value
                .clone()
                .unwrap_or_else(ByteString::empty);
            let merged = pushdown.append(&child_existing);
            self.arena[child_idx].value = Some(merged);
        }
        self.arena[idx].value = Some(common.clone());
        remainder.suffix(common.len())
    }

    /// Compiles the builder's state into an immutable packed buffer,
    /// deduplicating structurally identical suffix subtrees.
    pub fn compile(&self) -> DictResult<Vec<u8>> {
        builder::compile(&self.arena, self.root)
    }

    /// Number of nodes in the pre-compile arena, for instrumentation.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

impl Default for VpfstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn read_root_offset(bytes: &[u8]) -> DictResult<usize> {
    reader::read_root_offset(bytes)
}

pub(crate) fn lookup(bytes: &[u8], root: usize, key: &[u8]) -> DictResult<Option<ByteString>> {
    reader::lookup(bytes, root, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributes_shared_value_prefix_across_descendants() {
        let mut b = VpfstBuilder::new();
        b.insert(b"key", ByteString::from_utf8("value"), true);
        b.insert(b"key1", ByteString::from_utf8("value1"), true);
        b.insert(b"key12", ByteString::from_utf8("value12"), false);
        b.insert(b"key123", ByteString::from_utf8("value123"), true);

        let compiled = b.compile().unwrap();
        let root = read_root_offset(&compiled).unwrap();
        assert_eq!(
            lookup(&compiled, root, b"key").unwrap(),
            Some(ByteString::from_utf8("value"))
        );
        assert_eq!(
            lookup(&compiled, root, b"key1").unwrap(),
            Some(ByteString::from_utf8("value1"))
        );
        assert_eq!(
            lookup(&compiled, root, b"key12").unwrap(),
            Some(ByteString::from_utf8("value12"))
        );
        assert_eq!(
            lookup(&compiled, root, b"key123").unwrap(),
            Some(ByteString::from_utf8("value123"))
        );
    }

    #[test]
    fn shorter_key_value_survives_a_longer_sibling_insertion() {
        let mut b = VpfstBuilder::new();
        b.insert(b"key", ByteString::from_utf8("value"), false);
        b.insert(b"key1", ByteString::from_utf8("value1"), false);

        let compiled = b.compile().unwrap();
        let root = read_root_offset(&compiled).unwrap();
        assert_eq!(
            lookup(&compiled, root, b"key").unwrap(),
            Some(ByteString::from_utf8("value"))
        );
        assert_eq!(
            lookup(&compiled, root, b"key1").unwrap(),
            Some(ByteString::from_utf8("value1"))
        );
    }
}
