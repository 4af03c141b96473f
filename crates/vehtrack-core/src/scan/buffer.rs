/// Fixed-capacity byte window with an explicit fill length.
///
/// Bytes `[0, len)` are valid; the rest of the storage is scratch space for
/// the next read. Compaction keeps the unconsumed bytes at the front.
pub struct ScanBuffer {
    storage: Vec<u8>,
    len: usize,
}

impl ScanBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Room left after the valid bytes.
    pub fn spare(&self) -> usize {
        self.storage.len() - self.len
    }

    pub fn filled(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Whole backing storage, for sources that write at `len()`.
    pub fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// Mark `count` bytes after the valid region as filled.
    pub fn commit(&mut self, count: usize) {
        debug_assert!(count <= self.spare());
        self.len = (self.len + count).min(self.storage.len());
    }

    /// Drop `consumed` bytes from the front and shift the rest down.
    pub fn compact(&mut self, consumed: usize) {
        debug_assert!(consumed <= self.len);
        let consumed = consumed.min(self.len);
        self.storage.copy_within(consumed..self.len, 0);
        self.len -= consumed;
    }
}

#[cfg(test)]
mod tests {
    use super::ScanBuffer;

    #[test]
    fn commit_and_compact_keep_tail_at_front() {
        let mut buffer = ScanBuffer::new(8);
        buffer.storage_mut()[..6].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        buffer.commit(6);
        assert_eq!(buffer.filled(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buffer.spare(), 2);

        buffer.compact(4);
        assert_eq!(buffer.filled(), &[5, 6]);
        assert_eq!(buffer.spare(), 6);
    }

    #[test]
    fn compact_everything_empties_buffer() {
        let mut buffer = ScanBuffer::new(4);
        buffer.commit(3);
        buffer.compact(3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 4);
    }

    #[test]
    fn compact_nothing_is_a_no_op() {
        let mut buffer = ScanBuffer::new(4);
        buffer.storage_mut()[..2].copy_from_slice(&[9, 8]);
        buffer.commit(2);
        buffer.compact(0);
        assert_eq!(buffer.filled(), &[9, 8]);
    }
}
