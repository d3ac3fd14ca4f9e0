//! Storage configuration.

use std::path::PathBuf;

/// Configuration handed to [`Store::open`](crate::Store::open).
///
/// The store bounds its total on-disk size to `max_size` bytes, evicting
/// least-recently-used records to stay under it.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory the store keeps its records and journal in.
    pub directory: PathBuf,
    /// Upper bound on total stored bytes.
    pub max_size: u64,
}

impl StorageConfig {
    pub fn new(directory: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            directory: directory.into(),
            max_size,
        }
    }
}
