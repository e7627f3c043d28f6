//! Raw persistence: a compiled dictionary's packed buffer is exactly
//! what gets written to and read from disk. There is no framing, magic
//! number, or version byte — the caller is responsible for knowing what
//! kind of dictionary a given file holds.

use std::fs;
use std::path::Path;

use crate::dict::{VdctDictionary, VpfstDictionary};
use crate::error::DictResult;

impl VdctDictionary {
    /// Writes the compiled buffer to `path`.
    ///
    /// # Errors
    /// `InvalidState` if not yet compiled; `Io` on filesystem failure.
    pub fn save(&self, path: impl AsRef<Path>) -> DictResult<()> {
        fs::write(path, self.compiled_bytes()?)?;
        Ok(())
    }

    /// Reads a previously saved compiled buffer from `path`.
    ///
    /// # Errors
    /// `Io` on filesystem failure; `Corrupt` if the header cannot be
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> DictResult<Self> {
        let bytes = fs::read(path)?;
        Self::from_compiled_bytes(bytes)
    }
}

impl VpfstDictionary {
    /// Writes the compiled buffer to `path`.
    ///
    /// # Errors
    /// `InvalidState` if not yet compiled; `Io` on filesystem failure.
    pub fn save(&self, path: impl AsRef<Path>) -> DictResult<()> {
        fs::write(path, self.compiled_bytes()?)?;
        Ok(())
    }

    /// Reads a previously saved compiled buffer from `path`.
    ///
    /// # Errors
    /// `Io` on filesystem failure; `Corrupt` if the header cannot be
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> DictResult<Self> {
        let bytes = fs::read(path)?;
        Self::from_compiled_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::ByteString;

    #[test]
    fn vdct_save_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("vdct-io-test-{}", std::process::id()));
        let mut dict = VdctDictionary::new();
        dict.put(&ByteString::from_utf8("a"), &ByteString::from_utf8("1"))
            .unwrap();
        dict.compile().unwrap();
        dict.save(&dir).unwrap();

        let loaded = VdctDictionary::load(&dir).unwrap();
        assert_eq!(
            loaded.get(&ByteString::from_utf8("a")).unwrap(),
            Some(ByteString::from_utf8("1"))
        );
        let _ = fs::remove_file(&dir);
    }

    #[test]
    fn vpfst_save_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("vpfst-io-test-{}", std::process::id()));
        let mut dict = VpfstDictionary::new();
        dict.put(&ByteString::from_utf8("a"), &ByteString::from_utf8("1"))
            .unwrap();
        dict.compile().unwrap();
        dict.save(&dir).unwrap();

        let loaded = VpfstDictionary::load(&dir).unwrap();
        assert_eq!(
            loaded.get(&ByteString::from_utf8("a")).unwrap(),
            Some(ByteString::from_utf8("1"))
        );
        let _ = fs::remove_file(&dir);
    }
}
