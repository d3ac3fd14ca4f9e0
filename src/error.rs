//! Error taxonomy for storage operations.
//!
//! Three failure classes cross the adapter boundary: I/O failures from the
//! underlying store (propagated unchanged, never retried), corrupt or
//! truncated metadata found while decoding a record, and an update callback
//! refusing to produce a new entry. Write contention is deliberately absent
//! from this list — a declined editor is a silent no-op, not an error.

use thiserror::Error;

/// A `Result` alias where the `Err` case is [`StorageError`].
pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// Failure raised by a cache storage operation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Disk read/write/open failure reported by the underlying store.
    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or truncated record metadata.
    #[error("corrupt cache record: {detail}")]
    Corrupt { detail: String },

    /// The caller-supplied update callback declined to produce an entry.
    /// No write was performed.
    #[error("cache update rejected: {0}")]
    UpdateRejected(#[from] UpdateRejected),
}

impl StorageError {
    pub(crate) fn corrupt(detail: impl Into<String>) -> Self {
        StorageError::Corrupt {
            detail: detail.into(),
        }
    }

    /// True if this failure means the stored record cannot be decoded.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt { .. })
    }
}

/// Refusal signalled by an [`update_entry`](crate::DiskLruStorage::update_entry)
/// callback.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct UpdateRejected {
    reason: String,
}

impl UpdateRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
