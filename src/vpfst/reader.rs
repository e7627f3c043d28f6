//! Read-only lookup over a compiled VPFST buffer.
//!
//! Unlike VDCT, a value is never stored whole in one place: each node
//! along the descent contributes its own fragment, and lookup
//! reconstructs the full value by accumulating fragments as it walks.

use crate::bytes::ByteString;
use crate::error::{CorruptReason, DictError, DictResult};
use crate::varint::decode_varint;

const FLAG_IS_KEY_END: u8 = 0x01;
const FLAG_IS_PREFIX_END: u8 = 0x02;
const FLAG_HAS_VALUE: u8 = 0x04;

fn read_u8(bytes: &[u8], pos: usize) -> DictResult<u8> {
    bytes.get(pos).copied().ok_or(DictError::Corrupt {
        reason: CorruptReason::OffsetOutOfRange,
        offset: pos,
    })
}

fn binary_search_edge(
    bytes: &[u8],
    base: usize,
    count: usize,
    width: usize,
    target: u8,
) -> DictResult<Option<usize>> {
    if width < 2 {
        return Err(DictError::Corrupt {
            reason: CorruptReason::ZeroEdgeWidth,
            offset: base,
        });
    }
    let mut lo: i64 = 0;
    let mut hi: i64 = count as i64 - 1;
    while lo <= hi {
        let mid = (lo + hi) / 2;
        let rec_off = base + (mid as usize) * width;
        let byte = read_u8(bytes, rec_off)?;
        match byte.cmp(&target) {
            std::cmp::Ordering::Equal => {
                let (off, _) = decode_varint(bytes, rec_off + 1)?;
                return Ok(Some(off as usize));
            }
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid - 1,
        }
    }
    Ok(None)
}

pub(crate) fn read_root_offset(bytes: &[u8]) -> DictResult<usize> {
    let header = bytes.get(0..4).ok_or(DictError::Corrupt {
        reason: CorruptReason::OffsetOutOfRange,
        offset: 0,
    })?;
    Ok(u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize)
}

pub(crate) fn lookup(bytes: &[u8], root: usize, key: &[u8]) -> DictResult<Option<ByteString>> {
    let mut pos = root;
    let mut key_idx = 0;
    let mut acc: Vec<u8> = Vec::new();
    let mut longest_prefix: Option<Vec<u8>> = None;

    loop {
        let flags = read_u8(bytes, pos)?;
        let mut cursor = pos + 1;

        if flags & FLAG_HAS_VALUE != 0 {
            let (len, w) = decode_varint(bytes, cursor)?;
            cursor += w;
            let len = len as usize;
            let end = cursor.checked_add(len).ok_or(DictError::Corrupt {
                reason: CorruptReason::OffsetOutOfRange,
                offset: cursor,
            })?;
            let seg = bytes.get(cursor..end).ok_or(DictError::Corrupt {
                reason: CorruptReason::OffsetOutOfRange,
                offset: cursor,
            })?;
            acc.extend_from_slice(seg);
            cursor = end;
        }

        if flags & FLAG_IS_PREFIX_END != 0 {
            longest_prefix = Some(acc.clone());
        }

        if key_idx == key.len() {
            if flags & FLAG_IS_KEY_END != 0 {
                return Ok(Some(ByteString::new(acc)));
            }
            break;
        }

        let (child_count, w1) = decode_varint(bytes, cursor)?;
        cursor += w1;
        let (edge_width, w2) = decode_varint(bytes, cursor)?;
        cursor += w2;

        let target = key[key_idx];
        match binary_search_edge(bytes, cursor, child_count as usize, edge_width as usize, target)? {
            Some(child_off) => {
                pos = child_off;
                key_idx += 1;
            }
            None => break,
        }
    }

    Ok(longest_prefix.map(ByteString::new))
}
