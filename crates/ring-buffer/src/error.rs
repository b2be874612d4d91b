//! Buffer Error Types

use thiserror::Error;

/// Errors returned by buffer operations. Neither one mutates the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Insertion attempted on a saturated buffer
    #[error("buffer is full")]
    Full,

    /// Removal or listing attempted on a drained buffer
    #[error("buffer is empty")]
    Empty,
}
