//! `ByteString` — an immutable, cheaply-cloneable byte sequence.
//!
//! This is the value type threaded through the whole crate: trie keys,
//! trie values, and the fragments a [`crate::vpfst`] node distributes
//! along its edges are all `ByteString`. Equality and ordering are plain
//! unsigned byte-wise comparison (`u8` has no other reading in Rust), and
//! hashing is stable across runs and platforms via a hand-rolled
//! MurmurHash3 x86/32, per the crate's published-format contract.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An immutable sequence of bytes.
///
/// Clones are `Arc` pointer copies, so slicing helpers (`suffix`,
/// `common_prefix`, ...) are cheap to chain during trie construction.
#[derive(Clone, Eq)]
pub struct ByteString(Arc<[u8]>);

impl ByteString {
    /// Builds a `ByteString` from any owned byte source.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    /// Builds a `ByteString` by copying a borrowed slice.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }

    /// Builds a `ByteString` from UTF-8 text. Convenience only — the
    /// dictionary treats the content as opaque bytes from this point on.
    pub fn from_utf8(text: &str) -> Self {
        Self::from_slice(text.as_bytes())
    }

    /// The distinguished empty byte string.
    pub fn empty() -> Self {
        Self(Arc::from(&[][..]))
    }

    /// Number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` iff this is the empty byte string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Byte at index `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn byte_at(&self, i: usize) -> u8 {
        self.0[i]
    }

    /// Borrows the content as a plain slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Unsigned lexicographic comparison. Named distinctly from `Ord`
    /// only because the source format this crate's on-wire layout is
    /// drawn from occasionally compares bytes as signed values; `u8` in
    /// Rust has no such ambiguity; this crate compares unsigned
    /// everywhere, including here.
    pub fn compare_unsigned(&self, other: &ByteString) -> Ordering {
        self.0.as_ref().cmp(other.0.as_ref())
    }

    /// Longest common prefix of `self` and `other`, as a new `ByteString`.
    pub fn common_prefix(&self, other: &ByteString) -> ByteString {
        let n = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count();
        ByteString::from_slice(&self.0[..n])
    }

    /// The tail starting at `offset`. `offset > len` saturates to the
    /// empty byte string rather than panicking.
    pub fn suffix(&self, offset: usize) -> ByteString {
        let offset = offset.min(self.0.len());
        ByteString::from_slice(&self.0[offset..])
    }

    /// `self` followed by `other`.
    pub fn append(&self, other: &ByteString) -> ByteString {
        let mut v = Vec::with_capacity(self.len() + other.len());
        v.extend_from_slice(&self.0);
        v.extend_from_slice(&other.0);
        ByteString::new(v)
    }

    /// `other` followed by `self`.
    pub fn prepend(&self, other: &ByteString) -> ByteString {
        other.append(self)
    }

    /// Deterministic 32-bit hash (MurmurHash3 x86/32, seed 0), stable
    /// across runs and platforms — unlike `std::hash::Hash`'s
    /// `SipHash`, which is randomly seeded per process.
    pub fn hash32(&self) -> u32 {
        murmur3_x86_32(&self.0, 0)
    }
}

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl PartialOrd for ByteString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_unsigned(other))
    }
}

impl Ord for ByteString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_unsigned(other)
    }
}

impl Hash for ByteString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state);
    }
}

impl Default for ByteString {
    fn default() -> Self {
        Self::empty()
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self::from_utf8(s)
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(v: Vec<u8>) -> Self {
        Self::new(v)
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "ByteString({s:?})"),
            Err(_) => write!(f, "ByteString({:?})", self.0),
        }
    }
}

/// MurmurHash3 x86/32. Public-domain algorithm by Austin Appleby,
/// transcribed directly from the reference C implementation.
fn murmur3_x86_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h1 = seed;
    let chunks = data.chunks_exact(4);
    let tail = chunks.remainder();

    for chunk in chunks {
        let mut k1 = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);

        h1 ^= k1;
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let mut k1: u32 = 0;
    for (i, &b) in tail.iter().enumerate().rev() {
        k1 ^= (b as u32) << (8 * i);
    }
    if !tail.is_empty() {
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);
        h1 ^= k1;
    }

    h1 ^= data.len() as u32;
    h1 ^= h1 >> 16;
    h1 = h1.wrapping_mul(0x85eb_ca6b);
    h1 ^= h1 >> 13;
    h1 = h1.wrapping_mul(0xc2b2_ae35);
    h1 ^= h1 >> 16;
    h1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_and_ordering() {
        let a = ByteString::from_utf8("abc");
        let b = ByteString::from_utf8("abc");
        let c = ByteString::from_utf8("abd");
        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(a.compare_unsigned(&c), Ordering::Less);
    }

    #[test]
    fn common_prefix_and_suffix() {
        let a = ByteString::from_utf8("key123");
        let b = ByteString::from_utf8("key12x");
        assert_eq!(a.common_prefix(&b), ByteString::from_utf8("key12"));
        assert_eq!(a.suffix(3), ByteString::from_utf8("123"));
        assert_eq!(a.suffix(100), ByteString::empty());
    }

    #[test]
    fn append_and_prepend() {
        let a = ByteString::from_utf8("foo");
        let b = ByteString::from_utf8("bar");
        assert_eq!(a.append(&b), ByteString::from_utf8("foobar"));
        assert_eq!(a.prepend(&b), ByteString::from_utf8("barfoo"));
    }

    #[test]
    fn hash32_is_deterministic() {
        let a = ByteString::from_utf8("hello world");
        let b = ByteString::from_utf8("hello world");
        assert_eq!(a.hash32(), b.hash32());
        // Reference value for seed 0, computed against the canonical
        // MurmurHash3 x86_32 reference implementation.
        assert_eq!(ByteString::from_utf8("").hash32(), 0);
    }

    #[test]
    fn empty_is_singleton_content() {
        assert_eq!(ByteString::empty(), ByteString::from_slice(&[]));
        assert!(ByteString::empty().is_empty());
    }
}
