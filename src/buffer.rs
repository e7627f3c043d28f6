//! A growable byte buffer with a cursor, used to assemble compiled
//! trie images one node record at a time.

/// A growable `Vec<u8>` with a movable write/read cursor.
///
/// Writes past the current length extend the buffer; writes inside the
/// current length overwrite in place. This lets a compiler patch the
/// four-byte root-offset header after the rest of the buffer has been
/// written.
#[derive(Debug, Default, Clone)]
pub struct ByteBuffer {
    data: Vec<u8>,
    pos: usize,
}

impl ByteBuffer {
    /// An empty buffer positioned at offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with preallocated capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            data: Vec::with_capacity(cap),
            pos: 0,
        }
    }

    /// Total bytes currently held, irrespective of cursor position.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` iff no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to an arbitrary position, including past the
    /// current end (the next write will extend the buffer, zero-filling
    /// the gap).
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Writes a single byte at the cursor and advances it.
    pub fn write_u8(&mut self, byte: u8) {
        self.write_bytes(&[byte]);
    }

    /// Writes `bytes` at the cursor and advances it by their length,
    /// extending the buffer if the cursor plus length runs past the
    /// current end.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    /// Reads a single byte at the cursor and advances it, or `None` at
    /// end of buffer.
    pub fn read_u8(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    /// Reads `n` bytes at the cursor and advances it, or `None` if fewer
    /// than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    /// Drops everything at or past the cursor.
    pub fn truncate_to_position(&mut self) {
        self.data.truncate(self.pos);
    }

    /// Appends the active range (`0..position`) of `other` to the end of
    /// `self`, leaving `self`'s own cursor at the new end.
    pub fn append_active_range(&mut self, other: &ByteBuffer) {
        self.pos = self.data.len();
        self.write_bytes(&other.data[..other.pos]);
    }

    /// Borrows the whole buffer, irrespective of cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, returning its backing storage.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
