//! Critical-Section Ring Buffer Implementation

use crate::{BufferError, Snapshot, BUFSIZE};
use critical_lock::{Protected, RawLock, SpinLock};
use tracing::{debug, trace};

/// Indices and storage, only reachable under the buffer's lock
struct State<const N: usize> {
    /// Pre-allocated storage
    storage: [u32; N],
    /// Next element to read
    head: usize,
    /// Next free slot to write
    tail: usize,
    /// Number of live elements
    count: usize,
}

impl<const N: usize> State<N> {
    const fn new() -> Self {
        Self {
            storage: [0; N],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    fn put(&mut self, value: u32) -> Result<(), BufferError> {
        if self.count == N {
            return Err(BufferError::Full);
        }
        self.storage[self.tail] = value;
        self.tail = (self.tail + 1) % N;
        self.count += 1;
        Ok(())
    }

    fn get(&mut self) -> Result<u32, BufferError> {
        if self.count == 0 {
            return Err(BufferError::Empty);
        }
        let value = self.storage[self.head];
        self.head = (self.head + 1) % N;
        self.count -= 1;
        Ok(value)
    }

    fn snapshot(&self) -> Snapshot<N> {
        let mut snapshot = Snapshot::empty();
        for i in 0..self.count {
            snapshot.push(self.storage[(self.head + i) % N]);
        }
        snapshot
    }
}

/// Bounded FIFO of integers guarded by its own critical section.
///
/// `N` is the capacity, `R` the lock backend. A full buffer rejects new
/// values rather than overwriting the oldest one; an empty buffer reports
/// `BufferError::Empty`. Neither case blocks.
///
/// ```
/// use ring_buffer::{BufferError, IntRingBuffer};
///
/// static READINGS: IntRingBuffer = IntRingBuffer::new();
///
/// READINGS.put_item(21).unwrap();
/// assert_eq!(READINGS.get_item(), Ok(21));
/// assert_eq!(READINGS.get_item(), Err(BufferError::Empty));
/// ```
pub struct IntRingBuffer<const N: usize = BUFSIZE, R: RawLock = SpinLock> {
    state: Protected<State<N>, R>,
}

impl<const N: usize, R: RawLock> IntRingBuffer<N, R> {
    const NON_ZERO_CAPACITY: () = assert!(N > 0, "ring buffer capacity must be non-zero");

    /// Create an empty buffer with an unlocked lock.
    ///
    /// This is the only way to build a buffer; it is `const` so the buffer
    /// can be placed in a `static`.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO_CAPACITY;
        Self {
            state: Protected::new(State::new()),
        }
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.state.with(|s| s.count == 0)
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.state.with(|s| s.count == N)
    }

    /// Append a value at the tail
    pub fn put_item(&self, value: u32) -> Result<(), BufferError> {
        let result = self.state.with(|s| s.put(value));
        if result.is_err() {
            trace!("put_item({}) rejected: buffer full", value);
        }
        result
    }

    /// Remove the value at the head
    pub fn get_item(&self) -> Result<u32, BufferError> {
        let result = self.state.with(|s| s.get());
        if result.is_err() {
            trace!("get_item rejected: buffer empty");
        }
        result
    }

    /// Number of values currently stored
    pub fn number(&self) -> usize {
        self.state.with(|s| s.count)
    }

    /// Get the buffer capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Copy the live values in FIFO order without removing them.
    ///
    /// The copy is taken in one critical section; logging happens after the
    /// lock is released.
    pub fn list_buffer(&self) -> Result<Snapshot<N>, BufferError> {
        let snapshot = self.state.with(|s| s.snapshot());
        if snapshot.is_empty() {
            return Err(BufferError::Empty);
        }
        debug!("Buffer contents ({} items): {}", snapshot.len(), snapshot);
        Ok(snapshot)
    }
}

impl<const N: usize, R: RawLock> Default for IntRingBuffer<N, R> {
    fn default() -> Self {
        Self::new()
    }
}
