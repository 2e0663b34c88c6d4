//! Command history ring
//!
//! Static allocation, 10 slots of one line each.

use super::ring_buffer::RING_BUFFER_SIZE;

/// Number of history slots
pub const HISTORY_SIZE: usize = 10;

/// History slot width, matching the line buffer
pub const SLOT_SIZE: usize = RING_BUFFER_SIZE;

/// Fixed ring of previously submitted lines
///
/// Recall serves the slot at the current index. The index is never
/// advanced and the console's submit path does not append, so on the
/// device up-arrow always sees slot 0, which stays empty. This mirrors
/// the shipped behavior and is kept until working recall is wanted.
//
// TODO: advance `index` in push() and call push() from Console::submit
// so up-arrow walks real history.
pub struct History {
    entries: [[u8; SLOT_SIZE]; HISTORY_SIZE],
    lengths: [usize; HISTORY_SIZE],
    index: usize,
}

impl History {
    /// Create empty history
    pub const fn new() -> Self {
        Self {
            entries: [[0u8; SLOT_SIZE]; HISTORY_SIZE],
            lengths: [0; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Store a line in the slot at the current index.
    pub fn push(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let len = bytes.len().min(SLOT_SIZE);

        self.entries[self.index][..len].copy_from_slice(&bytes[..len]);
        self.lengths[self.index] = len;
    }

    /// Copy the entry at the current index into `buf`.
    ///
    /// Returns the entry length; 0 means nothing to recall.
    pub fn recall_into(&self, buf: &mut [u8]) -> usize {
        let len = self.lengths[self.index].min(buf.len());
        buf[..len].copy_from_slice(&self.entries[self.index][..len]);
        len
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
