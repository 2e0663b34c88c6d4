//! Lock-free byte ring buffer
//!
//! SPSC (single producer, single consumer) for console input bytes.
//! Uses atomic indices so the UART RX interrupt and the foreground
//! loop can share one instance without a lock.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Capacity of the console ring buffers, sized for one worst-case input line.
pub const RING_BUFFER_SIZE: usize = 64;

/// Byte ring buffer with static size
///
/// N must be a power of 2 for efficient modulo.
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - Exactly one producer advances `write_idx`, exactly one consumer
///   advances `read_idx`
/// - Each index update is a single atomic store with Release/Acquire
///   pairing, so the other context always observes a consistent prefix
/// - `delete_last` and `flush` are owner-side edits: call them only from
///   the context that also holds the matching producer/consumer role
///   (the line buffer is foreground-owned on both sides; the ingest
///   buffer never uses them from the interrupt)
pub struct RingBuffer<const N: usize = RING_BUFFER_SIZE> {
    buf: UnsafeCell<[u8; N]>,

    /// Next write index (monotonically increasing, wraps via mask).
    write_idx: AtomicUsize,

    /// Next read index (monotonically increasing, wraps via mask).
    read_idx: AtomicUsize,
}

// SAFETY: Single producer, single consumer, atomic index coordination.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}
unsafe impl<const N: usize> Send for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    const MASK: usize = N - 1;

    /// Create new empty buffer
    pub const fn new() -> Self {
        // Compile-time check that N is power of 2
        const { assert!(N.is_power_of_two(), "Buffer size must be power of 2") };

        Self {
            buf: UnsafeCell::new([0u8; N]),
            write_idx: AtomicUsize::new(0),
            read_idx: AtomicUsize::new(0),
        }
    }

    /// Push a byte (producer side).
    ///
    /// Returns `false` and leaves the buffer unchanged when full. A full
    /// buffer is the console's only backpressure signal; the interrupt
    /// never blocks on it.
    #[inline]
    pub fn write(&self, byte: u8) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N {
            return false; // Full
        }

        // SAFETY: Single producer, slot not yet published
        unsafe {
            (*self.buf.get())[write & Self::MASK] = byte;
        }
        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pop the oldest unread byte (consumer side).
    ///
    /// Returns `None` if the buffer is empty.
    #[inline]
    pub fn read(&self) -> Option<u8> {
        let write = self.write_idx.load(Ordering::Acquire);
        let read = self.read_idx.load(Ordering::Relaxed);

        if write == read {
            return None; // Empty
        }

        // SAFETY: Slot was published by the matching Release store
        let byte = unsafe { (*self.buf.get())[read & Self::MASK] };
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    /// Remove the most recently written unread byte (backspace support).
    ///
    /// Returns `false` if the buffer is empty. Producer-side operation.
    #[inline]
    pub fn delete_last(&self) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write == read {
            return false;
        }

        self.write_idx.store(write.wrapping_sub(1), Ordering::Release);
        true
    }

    /// Discard all unread bytes (consumer side).
    #[inline]
    pub fn flush(&self) {
        let write = self.write_idx.load(Ordering::Acquire);
        self.read_idx.store(write, Ordering::Release);
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        let write = self.write_idx.load(Ordering::Acquire);
        let read = self.read_idx.load(Ordering::Relaxed);
        write.wrapping_sub(read).min(N)
    }

    /// Check if buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if buffer is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Get the buffer capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_round_trip() {
        let ring = RingBuffer::<8>::new();

        for b in b"help" {
            assert!(ring.write(*b));
        }

        assert_eq!(ring.len(), 4);
        assert_eq!(ring.read(), Some(b'h'));
        assert_eq!(ring.read(), Some(b'e'));
        assert_eq!(ring.read(), Some(b'l'));
        assert_eq!(ring.read(), Some(b'p'));
        assert_eq!(ring.read(), None);
    }

    #[test]
    fn test_write_full_fails_unchanged() {
        let ring = RingBuffer::<4>::new();

        assert!(ring.write(1));
        assert!(ring.write(2));
        assert!(ring.write(3));
        assert!(ring.write(4));
        assert!(ring.is_full());

        // Rejected write must not disturb content
        assert!(!ring.write(5));
        assert_eq!(ring.read(), Some(1));
        assert_eq!(ring.read(), Some(2));
        assert_eq!(ring.read(), Some(3));
        assert_eq!(ring.read(), Some(4));
        assert_eq!(ring.read(), None);
    }

    #[test]
    fn test_delete_last() {
        let ring = RingBuffer::<8>::new();

        assert!(!ring.delete_last());

        ring.write(b'a');
        ring.write(b'b');
        assert!(ring.delete_last());
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.read(), Some(b'a'));
        assert_eq!(ring.read(), None);
    }

    #[test]
    fn test_flush_always_empties() {
        let ring = RingBuffer::<4>::new();

        ring.flush();
        assert!(ring.is_empty());

        ring.write(1);
        ring.write(2);
        ring.flush();
        assert!(ring.is_empty());
        assert_eq!(ring.read(), None);

        // Buffer stays usable after flush
        assert!(ring.write(9));
        assert_eq!(ring.read(), Some(9));
    }

    #[test]
    fn test_wraparound() {
        let ring = RingBuffer::<4>::new();

        for round in 0..10u8 {
            assert!(ring.write(round));
            assert!(ring.write(round.wrapping_add(100)));
            assert_eq!(ring.read(), Some(round));
            assert_eq!(ring.read(), Some(round.wrapping_add(100)));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_spsc_concurrent() {
        use std::sync::Arc;
        use std::thread;

        let ring = Arc::new(RingBuffer::<64>::new());
        let producer_ring = Arc::clone(&ring);

        let producer = thread::spawn(move || {
            let mut sent = 0u32;
            while sent < 10_000 {
                if producer_ring.write((sent & 0xFF) as u8) {
                    sent += 1;
                }
            }
        });

        let mut received = 0u32;
        while received < 10_000 {
            if let Some(byte) = ring.read() {
                assert_eq!(byte, (received & 0xFF) as u8, "FIFO order violated");
                received += 1;
            }
        }

        producer.join().unwrap();
        assert!(ring.is_empty());
    }
}
