//! Protected Circular Integer Buffer
//!
//! Provides a bounded FIFO of `u32` values shared between producer and
//! consumer contexts (tasks or interrupt handlers). Every operation runs
//! inside the buffer's own critical section and never blocks: a full or
//! empty buffer is reported to the caller immediately.

mod buffer;
mod error;
mod snapshot;

pub use buffer::IntRingBuffer;
pub use error::BufferError;
pub use snapshot::Snapshot;

/// Default buffer capacity
pub const BUFSIZE: usize = 10;
