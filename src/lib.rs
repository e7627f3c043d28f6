//! A compact, in-memory key-value dictionary built on a compiled trie
//! core.
//!
//! Two variants share the same build-then-compile-then-lookup life
//! cycle but trade off differently:
//!
//! - [`VdctDictionary`] (Value-Dereferenced Compiled Trie): keys live in
//!   a packed trie, values live in a separate interned table. Good when
//!   values repeat or are individually large.
//! - [`VpfstDictionary`] (Value-Prefixed Compiled FST): values are
//!   distributed along the key path and structurally identical suffix
//!   subtrees are shared, producing a minimal acyclic transducer. Good
//!   when values share prefixes with each other.
//!
//! Both dictionaries are append-only while building, then frozen by
//! `compile` into an immutable packed byte buffer that `get` reads
//! directly — no decompression or rebuilding step. Mutation after
//! `compile`, or lookup before it, is a [`DictError::InvalidState`]
//! error rather than a panic.
//!
//! ```
//! use dictcore::{ByteString, VdctDictionary};
//!
//! let mut dict = VdctDictionary::new();
//! dict.put(&ByteString::from_utf8("hello"), &ByteString::from_utf8("world")).unwrap();
//! dict.compile().unwrap();
//! assert_eq!(
//!     dict.get(&ByteString::from_utf8("hello")).unwrap(),
//!     Some(ByteString::from_utf8("world"))
//! );
//! ```

#![warn(missing_docs, clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod buffer;
mod bytes;
mod dict;
mod error;
mod io;
mod varint;
mod vdct;
mod vpfst;

pub use bytes::ByteString;
pub use dict::{VdctDictionary, VpfstDictionary};
pub use error::{CorruptReason, DictError, DictResult};
