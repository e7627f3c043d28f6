//! Bottom-up compilation for VPFST, including suffix-subtree
//! deduplication (minimal acyclic transducer construction).

use std::collections::{HashMap, VecDeque};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::buffer::ByteBuffer;
use crate::bytes::ByteString;
use crate::error::DictResult;
use crate::varint::{encode_varint, varint_width};
use crate::vpfst::node::VpfstNode;

const FLAG_IS_KEY_END: u8 = 0x01;
const FLAG_IS_PREFIX_END: u8 = 0x02;
const FLAG_HAS_VALUE: u8 = 0x04;

/// The structural identity of a compiled node: two nodes with the same
/// fingerprint are interchangeable and may share a single emitted
/// record. Equality here is exact structural equality, so a hash
/// collision between two different fingerprints can never cause an
/// incorrect alias — `HashMap` always re-checks `Eq` on a bucket hit.
#[derive(Hash, PartialEq, Eq, Clone)]
struct Fingerprint {
    value: Vec<u8>,
    is_key_end: bool,
    is_prefix_end: bool,
    children: Vec<(u8, u32)>,
}

pub(crate) fn compile(arena: &[VpfstNode], root: usize) -> DictResult<Vec<u8>> {
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

    let mut offsets: Vec<Option<u32>> = vec![None; arena.len()];
    let mut suffix_cache: HashMap<Fingerprint, u32> = HashMap::new();
    #[cfg(feature = "tracing")]
    let mut dedup_hits: u64 = 0;

    for level in levels.iter().rev() {
        for &idx in level {
            let node = &arena[idx];
            let children: Vec<(u8, u32)> = node
                .edges
                .iter()
                .map(|&(byte, child)| {
                    (
                        byte,
                        offsets[child].expect("child emitted before parent"),
                    )
                })
                .collect();

            let value_bytes: &[u8] = node.value.as_ref().map_or(&[], ByteString::as_slice);

            let fingerprint = Fingerprint {
                value: value_bytes.to_vec(),
                is_key_end: node.is_key_end,
                is_prefix_end: node.is_prefix_end,
                children: children.clone(),
            };

            if let Some(&existing_offset) = suffix_cache.get(&fingerprint) {
                offsets[idx] = Some(existing_offset);
                #[cfg(feature = "tracing")]
                {
                    dedup_hits += 1;
                }
                continue;
            }

            let offset = buf.position() as u32;

            let mut flags = 0u8;
            if node.is_key_end {
                flags |= FLAG_IS_KEY_END;
            }
            if node.is_prefix_end {
                flags |= FLAG_IS_PREFIX_END;
            }
            if !value_bytes.is_empty() {
                flags |= FLAG_HAS_VALUE;
            }
            buf.write_u8(flags);

            if !value_bytes.is_empty() {
                let mut tmp = Vec::new();
                encode_varint(value_bytes.len() as i32, &mut tmp);
                buf.write_bytes(&tmp);
                buf.write_bytes(value_bytes);
            }

            let mut tmp = Vec::new();
            encode_varint(children.len() as i32, &mut tmp);
            buf.write_bytes(&tmp);
            tmp.clear();

            let max_width = children
                .iter()
                .map(|&(_, off)| varint_width(off as i32))
                .max()
                .unwrap_or(1)
                .max(1);
            let edge_width = 1 + max_width;
            encode_varint(edge_width as i32, &mut tmp);
            buf.write_bytes(&tmp);

            for &(byte, child_off) in &children {
                let mut record = Vec::with_capacity(edge_width);
                record.push(byte);
                let mut off_bytes = Vec::new();
                encode_varint(child_off as i32, &mut off_bytes);
                record.extend_from_slice(&off_bytes);
                record.resize(edge_width, 0);
                buf.write_bytes(&record);
            }

            suffix_cache.insert(fingerprint, offset);
            offsets[idx] = Some(offset);
        }
    }

    #[cfg(feature = "tracing")]
    debug!(dedup_hits, "vpfst suffix-subtree deduplication complete");

    let root_offset = offsets[root].expect("root always emitted");
    buf.seek(0);
    buf.write_bytes(&root_offset.to_be_bytes());

    Ok(buf.into_vec())
}
