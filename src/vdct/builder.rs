//! Value table interning and bottom-up compilation for VDCT.

use std::collections::{HashMap, VecDeque};

use crate::buffer::ByteBuffer;
use crate::bytes::ByteString;
use crate::error::DictResult;
use crate::varint::{encode_varint, varint_width};
use crate::vdct::node::VdctNode;

const FLAG_HAS_VALUE: u8 = 0x01;
const FLAG_IS_PREFIX_END: u8 = 0x02;

/// An append-only table of interned values, referenced by node records
/// via a byte offset relative to the table's own start.
pub(crate) struct ValueTable {
    bytes: Vec<u8>,
    index: HashMap<ByteString, u32>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the offset of `value` within the table, inserting it (with
    /// a length-prefix record) on first use.
    pub fn intern(&mut self, value: &ByteString) -> u32 {
        if let Some(&off) = self.index.get(value) {
            return off;
        }
        let off = self.bytes.len() as u32;
        encode_varint(value.len() as i32, &mut self.bytes);
        self.bytes.extend_from_slice(value.as_slice());
        self.index.insert(value.clone(), off);
        off
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_retains_stale_entries_after_reinsert() {
        let mut values = ValueTable::new();
        let v = values.intern(&ByteString::from_utf8("v"));
        let v_again = values.intern(&ByteString::from_utf8("v"));
        let v2 = values.intern(&ByteString::from_utf8("v2"));
        assert_eq!(v, v_again);
        assert_ne!(v, v2);
        // Both "v" and "v2" remain addressable in the table; there is no
        // deletion path that could reclaim "v" once "a" is repointed to "v2".
        assert!(values.as_slice().len() > 0);
    }
}

/// Compiles the arena rooted at `root` plus its value table into a
/// single immutable buffer:
///
/// ```text
/// [0..4)              root node offset, big-endian u32
/// [4..4+V)             value table (length-prefixed entries)
/// [4+V..)              node records, bottom-up (children before parents)
/// ```
pub(crate) fn compile(arena: &[VdctNode], root: usize, values: &ValueTable) -> DictResult<Vec<u8>> {
    // Level-order traversal from the root; nodes are emitted in reverse
    // level order so every child is written before its parent needs to
    // reference its offset.
    let mut levels: Vec<Vec<usize>> = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back((root, 0usize));
    while let Some((idx, depth)) = queue.pop_front() {
        if levels.len() <= depth {
            levels.push(Vec::new());
        }
        levels[depth].push(idx);
        for &(_, child) in &arena[idx].edges {
            queue.push_back((child, depth + 1));
        }
    }

    let mut buf = ByteBuffer::new();
    buf.write_bytes(&[0, 0, 0, 0]);
    buf.write_bytes(values.as_slice());

    let mut offsets: Vec<Option<u32>> = vec![None; arena.len()];

    for level in levels.iter().rev() {
        for &idx in level {
            let node = &arena[idx];
            let offset = buf.position() as u32;

            let mut flags = 0u8;
            if node.value_ref.is_some() {
                flags |= FLAG_HAS_VALUE;
            }
            if node.is_prefix_end {
                flags |= FLAG_IS_PREFIX_END;
            }
            buf.write_u8(flags);

            if let Some(value_ref) = node.value_ref {
                let mut tmp = Vec::new();
                encode_varint(value_ref as i32, &mut tmp);
                buf.write_bytes(&tmp);
            }

            let mut tmp = Vec::new();
            encode_varint(node.edges.len() as i32, &mut tmp);
            buf.write_bytes(&tmp);
            tmp.clear();

            let max_width = node
                .edges
                .iter()
                .map(|&(_, child)| varint_width(offsets[child].expect("child emitted before parent") as i32))
                .max()
                .unwrap_or(1)
                .max(1);
            let edge_width = 1 + max_width;
            encode_varint(edge_width as i32, &mut tmp);
            buf.write_bytes(&tmp);

            for &(byte, child) in &node.edges {
                let child_off = offsets[child].expect("child emitted before parent");
                let mut record = Vec::with_capacity(edge_width);
                record.push(byte);
                let mut off_bytes = Vec::new();
                encode_varint(child_off as i32, &mut off_bytes);
                record.extend_from_slice(&off_bytes);
                record.resize(edge_width, 0);
                buf.write_bytes(&record);
            }

            offsets[idx] = Some(offset);
        }
    }

    let root_offset = offsets[root].expect("root always emitted");
    buf.seek(0);
    buf.write_bytes(&root_offset.to_be_bytes());

    Ok(buf.into_vec())
}
