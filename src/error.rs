//! Error values returned by the checked `RingBuf` operations.

use thiserror::Error;

/// Error value indicating that a checked operation could not proceed.
///
/// The buffer is left untouched whenever one of these is returned, so the
/// caller may retry once space (or data) is available.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Error)]
pub enum BufferError {
    /// An insertion would have overwritten unread elements.
    ///
    /// Only returned by `push` and `push_batch`.
    #[error("Buffer full")]
    Full,
    /// A removal asked for more elements than the buffer holds.
    ///
    /// Only returned by `pop` and `pop_batch`.
    #[error("Buffer empty")]
    Empty,
}

impl BufferError {
    /// Returns `true` for [`BufferError::Full`].
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, BufferError::Full)
    }

    /// Returns `true` for [`BufferError::Empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, BufferError::Empty)
    }
}
