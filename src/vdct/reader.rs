//! Read-only lookup over a compiled VDCT buffer.

use crate::bytes::ByteString;
use crate::error::{CorruptReason, DictError, DictResult};
use crate::varint::decode_varint;

const FLAG_HAS_VALUE: u8 = 0x01;
const FLAG_IS_PREFIX_END: u8 = 0x02;
const VALUE_TABLE_BASE: usize = 4;

fn read_u8(bytes: &[u8], pos: usize) -> DictResult<u8> {
    bytes.get(pos).copied().ok_or(DictError::Corrupt {
        reason: CorruptReason::OffsetOutOfRange,
        offset: pos,
    })
}

fn resolve_value(bytes: &[u8], value_ref: u32) -> DictResult<ByteString> {
    let start = VALUE_TABLE_BASE + value_ref as usize;
    let (len, width) = decode_varint(bytes, start)?;
    let len = len as usize;
    let data_start = start + width;
    let data_end = data_start.checked_add(len).ok_or(DictError::Corrupt {
        reason: CorruptReason::OffsetOutOfRange,
        offset: data_start,
    })?;
    let slice = bytes.get(data_start..data_end).ok_or(DictError::Corrupt {
        reason: CorruptReason::OffsetOutOfRange,
        offset: data_start,
    })?;
    Ok(ByteString::from_slice(slice))
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

/// Decodes the root node offset from the four-byte header.
pub(crate) fn read_root_offset(bytes: &[u8]) -> DictResult<usize> {
    let header = bytes.get(0..4).ok_or(DictError::Corrupt {
        reason: CorruptReason::OffsetOutOfRange,
        offset: 0,
    })?;
    Ok(u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize)
}

/// Looks up `key` in a compiled VDCT buffer, returning the longest
/// matching value (exact match wins over a shorter declared prefix).
pub(crate) fn lookup(bytes: &[u8], root: usize, key: &[u8]) -> DictResult<Option<ByteString>> {
    let mut pos = root;
    let mut key_idx = 0;
    let mut longest_prefix_ref: Option<u32> = None;

    while key_idx < key.len() {
        let flags = read_u8(bytes, pos)?;
        let mut cursor = pos + 1;
        let mut value_ref = None;
        if flags & FLAG_HAS_VALUE != 0 {
            let (v, w) = decode_varint(bytes, cursor)?;
            value_ref = Some(v as u32);
            cursor += w;
        }
        if flags & FLAG_IS_PREFIX_END != 0 {
            let v = value_ref.ok_or(DictError::Corrupt {
                reason: CorruptReason::InconsistentFlags,
                offset: pos,
            })?;
            longest_prefix_ref = Some(v);
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

    let mut exact_ref = None;
    if key_idx == key.len() {
        let flags = read_u8(bytes, pos)?;
        if flags & FLAG_HAS_VALUE != 0 {
            let (v, _) = decode_varint(bytes, pos + 1)?;
            exact_ref = Some(v as u32);
        }
    }

    match exact_ref.or(longest_prefix_ref) {
        Some(value_ref) => Ok(Some(resolve_value(bytes, value_ref)?)),
        None => Ok(None),
    }
}
