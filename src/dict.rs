//! Public dictionary façades: build, compile once, then look up.

use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::bytes::ByteString;
use crate::error::{DictError, DictResult};
use crate::vdct::{self, VdctBuilder};
use crate::vpfst::{self, VpfstBuilder};

enum VdctState {
    Building(VdctBuilder),
    Compiled { bytes: Arc<[u8]>, root: usize },
}

/// A compact dictionary backed by a value-dereferenced compiled trie.
///
/// `put` any number of times, `compile` once, then `get` repeatedly.
/// Mutation after compilation is rejected with `InvalidState`; lookup
/// before compilation likewise.
pub struct VdctDictionary {
    state: VdctState,
}

impl VdctDictionary {
    /// A fresh, empty, not-yet-compiled dictionary.
    pub fn new() -> Self {
        Self {
            state: VdctState::Building(VdctBuilder::new()),
        }
    }

    /// Associates `key` with `value`. Re-inserting an existing key
    /// silently overwrites its value.
    pub fn put(&mut self, key: &ByteString, value: &ByteString) -> DictResult<()> {
        self.put_as_prefix(key, value, false)
    }

    /// Associates `key` with `value`, additionally marking it as a
    /// declared prefix: subsequent lookups of any key extending `key`
    /// will fall back to `value` if no longer match exists.
    pub fn put_as_prefix(&mut self, key: &ByteString, value: &ByteString, as_prefix: bool) -> DictResult<()> {
        match &mut self.state {
            VdctState::Building(builder) => {
                builder.insert(key.as_slice(), value, as_prefix);
                Ok(())
            }
            VdctState::Compiled { .. } => Err(DictError::InvalidState(
                "cannot put into a compiled VdctDictionary",
            )),
        }
    }

    /// Freezes the dictionary into its immutable packed form. A no-op
    /// returning successfully if already compiled.
    pub fn compile(&mut self) -> DictResult<()> {
        if let VdctState::Building(builder) = &self.state {
            #[cfg(feature = "tracing")]
            let node_count = builder.node_count();
            let bytes = builder.compile()?;
            let root = vdct::read_root_offset(&bytes)?;
            #[cfg(feature = "tracing")]
            debug!(node_count, bytes = bytes.len(), "vdct compilation complete");
            self.state = VdctState::Compiled {
                bytes: Arc::from(bytes),
                root,
            };
        }
        Ok(())
    }

    /// Looks up `key`, returning its exact value, or the value of the
    /// longest declared prefix of `key` if no exact match exists.
    pub fn get(&self, key: &ByteString) -> DictResult<Option<ByteString>> {
        match &self.state {
            VdctState::Compiled { bytes, root } => {
                let result = vdct::lookup(bytes, *root, key.as_slice());
                #[cfg(feature = "tracing")]
                if let Err(DictError::Corrupt { reason, offset }) = &result {
                    warn!(offset, ?reason, "vdct lookup hit corrupt structure");
                }
                result
            }
            VdctState::Building(_) => Err(DictError::InvalidState(
                "cannot get from a VdctDictionary before compile",
            )),
        }
    }

    /// Reserved for future iteration support; always returns `None`.
    pub fn entries(&self) -> Option<std::convert::Infallible> {
        None
    }

    pub(crate) fn compiled_bytes(&self) -> DictResult<&[u8]> {
        match &self.state {
            VdctState::Compiled { bytes, .. } => Ok(bytes),
            VdctState::Building(_) => Err(DictError::InvalidState(
                "cannot save a VdctDictionary before compile",
            )),
        }
    }

    pub(crate) fn from_compiled_bytes(bytes: Vec<u8>) -> DictResult<Self> {
        let root = vdct::read_root_offset(&bytes)?;
        Ok(Self {
            state: VdctState::Compiled {
                bytes: Arc::from(bytes),
                root,
            },
        })
    }
}

impl Default for VdctDictionary {
    fn default() -> Self {
        Self::new()
    }
}

enum VpfstState {
    Building(VpfstBuilder),
    Compiled { bytes: Arc<[u8]>, root: usize },
}

/// A compact dictionary backed by a value-prefixed compiled FST.
///
/// Values that share prefixes with each other (hierarchical codes,
/// sorted identifiers) compress especially well, since the shared
/// prefix bytes and identical suffix subtrees are each stored once.
pub struct VpfstDictionary {
    state: VpfstState,
}

impl VpfstDictionary {
    /// A fresh, empty, not-yet-compiled dictionary.
    pub fn new() -> Self {
        Self {
            state: VpfstState::Building(VpfstBuilder::new()),
        }
    }

    /// Associates `key` with `value`. Re-inserting an existing key
    /// silently overwrites its value.
    pub fn put(&mut self, key: &ByteString, value: &ByteString) -> DictResult<()> {
        self.put_as_prefix(key, value, false)
    }

    /// Associates `key` with `value`, additionally marking it as a
    /// declared prefix.
    pub fn put_as_prefix(&mut self, key: &ByteString, value: &ByteString, as_prefix: bool) -> DictResult<()> {
        match &mut self.state {
            VpfstState::Building(builder) => {
                builder.insert(key.as_slice(), value.clone(), as_prefix);
                Ok(())
            }
            VpfstState::Compiled { .. } => Err(DictError::InvalidState(
                "cannot put into a compiled VpfstDictionary",
            )),
        }
    }

    /// Freezes the dictionary, deduplicating structurally identical
    /// suffix subtrees along the way.
    pub fn compile(&mut self) -> DictResult<()> {
        if let VpfstState::Building(builder) = &self.state {
            #[cfg(feature = "tracing")]
            let node_count = builder.node_count();
            let bytes = builder.compile()?;
            let root = vpfst::read_root_offset(&bytes)?;
            #[cfg(feature = "tracing")]
            debug!(node_count, bytes = bytes.len(), "vpfst compilation complete");
            self.state = VpfstState::Compiled {
                bytes: Arc::from(bytes),
                root,
            };
        }
        Ok(())
    }

    /// Looks up `key`, returning its exact value, or the value of the
    /// longest declared prefix of `key` if no exact match exists.
    pub fn get(&self, key: &ByteString) -> DictResult<Option<ByteString>> {
        match &self.state {
            VpfstState::Compiled { bytes, root } => {
                let result = vpfst::lookup(bytes, *root, key.as_slice());
                #[cfg(feature = "tracing")]
                if let Err(DictError::Corrupt { reason, offset }) = &result {
                    warn!(offset, ?reason, "vpfst lookup hit corrupt structure");
                }
                result
            }
            VpfstState::Building(_) => Err(DictError::InvalidState(
                "cannot get from a VpfstDictionary before compile",
            )),
        }
    }

    /// Reserved for future iteration support; always returns `None`.
    pub fn entries(&self) -> Option<std::convert::Infallible> {
        None
    }

    pub(crate) fn compiled_bytes(&self) -> DictResult<&[u8]> {
        match &self.state {
            VpfstState::Compiled { bytes, .. } => Ok(bytes),
            VpfstState::Building(_) => Err(DictError::InvalidState(
                "cannot save a VpfstDictionary before compile",
            )),
        }
    }

    pub(crate) fn from_compiled_bytes(bytes: Vec<u8>) -> DictResult<Self> {
        let root = vpfst::read_root_offset(&bytes)?;
        Ok(Self {
            state: VpfstState::Compiled {
                bytes: Arc::from(bytes),
                root,
            },
        })
    }
}

impl Default for VpfstDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vdct_exact_and_prefix_lookup() {
        let mut dict = VdctDictionary::new();
        dict.put(&ByteString::from_utf8("hello"), &ByteString::from_utf8("world"))
            .unwrap();
        dict.put_as_prefix(&ByteString::from_utf8("he"), &ByteString::from_utf8("short"), true)
            .unwrap();
        dict.compile().unwrap();

        assert_eq!(
            dict.get(&ByteString::from_utf8("hello")).unwrap(),
            Some(ByteString::from_utf8("world"))
        );
        assert_eq!(
            dict.get(&ByteString::from_utf8("help")).unwrap(),
            Some(ByteString::from_utf8("short"))
        );
        assert_eq!(dict.get(&ByteString::from_utf8("nope")).unwrap(), None);
    }

    #[test]
    fn vdct_rejects_put_after_compile_and_get_before() {
        let mut dict = VdctDictionary::new();
        assert!(dict.get(&ByteString::from_utf8("x")).is_err());
        dict.compile().unwrap();
        assert!(dict
            .put(&ByteString::from_utf8("x"), &ByteString::from_utf8("y"))
            .is_err());
    }

    #[test]
    fn vdct_empty_key_matches_root() {
        let mut dict = VdctDictionary::new();
        dict.put(&ByteString::empty(), &ByteString::from_utf8("root-value"))
            .unwrap();
        dict.compile().unwrap();
        assert_eq!(
            dict.get(&ByteString::empty()).unwrap(),
            Some(ByteString::from_utf8("root-value"))
        );
    }

    #[test]
    fn vdct_reinsert_overwrites() {
        let mut dict = VdctDictionary::new();
        let key = ByteString::from_utf8("k");
        dict.put(&key, &ByteString::from_utf8("old")).unwrap();
        dict.put(&key, &ByteString::from_utf8("new")).unwrap();
        dict.compile().unwrap();
        assert_eq!(dict.get(&key).unwrap(), Some(ByteString::from_utf8("new")));
    }

    #[test]
    fn vpfst_exact_and_prefix_lookup() {
        let mut dict = VpfstDictionary::new();
        dict.put(&ByteString::from_utf8("key"), &ByteString::from_utf8("value"))
            .unwrap();
        dict.put_as_prefix(
            &ByteString::from_utf8("key1"),
            &ByteString::from_utf8("value1"),
            true,
        )
        .unwrap();
        dict.compile().unwrap();

        assert_eq!(
            dict.get(&ByteString::from_utf8("key")).unwrap(),
            Some(ByteString::from_utf8("value"))
        );
        assert_eq!(
            dict.get(&ByteString::from_utf8("key1x")).unwrap(),
            Some(ByteString::from_utf8("value1"))
        );
        assert_eq!(dict.get(&ByteString::from_utf8("zzz")).unwrap(), None);
    }

    #[test]
    fn vpfst_empty_value_round_trips() {
        let mut dict = VpfstDictionary::new();
        dict.put(&ByteString::from_utf8("k"), &ByteString::empty()).unwrap();
        dict.compile().unwrap();
        assert_eq!(
            dict.get(&ByteString::from_utf8("k")).unwrap(),
            Some(ByteString::empty())
        );
    }

    #[test]
    fn vdct_value_dedup_and_reinsert() {
        let mut dict = VdctDictionary::new();
        dict.put(&ByteString::from_utf8("a"), &ByteString::from_utf8("v"))
            .unwrap();
        dict.put(&ByteString::from_utf8("b"), &ByteString::from_utf8("v"))
            .unwrap();
        dict.put(&ByteString::from_utf8("a"), &ByteString::from_utf8("v2"))
            .unwrap();
        dict.compile().unwrap();

        assert_eq!(
            dict.get(&ByteString::from_utf8("a")).unwrap(),
            Some(ByteString::from_utf8("v2"))
        );
        assert_eq!(
            dict.get(&ByteString::from_utf8("b")).unwrap(),
            Some(ByteString::from_utf8("v"))
        );
    }

    #[test]
    fn compile_is_byte_for_byte_idempotent() {
        let mut dict = VdctDictionary::new();
        dict.put(&ByteString::from_utf8("x"), &ByteString::from_utf8("y"))
            .unwrap();
        dict.compile().unwrap();
        let first = dict.compiled_bytes().unwrap().to_vec();
        dict.compile().unwrap();
        let second = dict.compiled_bytes().unwrap().to_vec();
        assert_eq!(first, second);

        assert!(dict
            .put(&ByteString::from_utf8("x"), &ByteString::from_utf8("z"))
            .is_err());
    }

    #[test]
    fn vdct_longest_prefix_at_multiple_depths() {
        let mut dict = VdctDictionary::new();
        dict.put_as_prefix(&ByteString::from_utf8("key"), &ByteString::from_utf8("value"), true)
            .unwrap();
        dict.put_as_prefix(&ByteString::from_utf8("key1"), &ByteString::from_utf8("value1"), true)
            .unwrap();
        dict.put_as_prefix(&ByteString::from_utf8("key12"), &ByteString::from_utf8("value12"), false)
            .unwrap();
        dict.put_as_prefix(
            &ByteString::from_utf8("key123"),
            &ByteString::from_utf8("value123"),
            false,
        )
        .unwrap();
        dict.compile().unwrap();

        let cases: &[(&str, Option<&str>)] = &[
            ("key", Some("value")),
            ("key1", Some("value1")),
            ("key12", Some("value12")),
            ("key123", Some("value123")),
            ("key111", Some("value1")),
            ("key121", Some("value1")),
            ("key21", Some("value")),
            ("ke1y", None),
        ];
        for (query, expected) in cases {
            assert_eq!(
                dict.get(&ByteString::from_utf8(query)).unwrap(),
                expected.map(ByteString::from_utf8),
                "query {query:?}"
            );
        }
    }
}
