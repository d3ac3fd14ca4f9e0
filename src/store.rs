//! Contract for the underlying disk LRU key-value store.
//!
//! The adapter consumes the store strictly through these traits. Eviction
//! policy, journal format, and crash recovery are the implementation's
//! business; the adapter relies only on the guarantees documented here:
//!
//! - **Atomic commit visibility**: a record's slots become visible together
//!   on [`Editor::commit`] or not at all. A reader never observes a partially
//!   written record.
//! - **Concurrent readers**: any number of snapshots of one committed record
//!   may be open at once, each independent of the others.
//! - **One writer per key**: at most one editor is in flight per key.
//!   [`Store::edit`] returns `Ok(None)` while another writer holds the key;
//!   later writers are declined, never interleaved.
//!
//! The adapter has no locks of its own, so an implementation that breaks
//! these guarantees breaks the adapter.

use std::io::{self, Read, Write};

use crate::config::StorageConfig;

/// Disk-backed LRU key-value store with multi-slot records.
pub trait Store: Send + Sync + Sized {
    type Snapshot: Snapshot;
    type Editor: Editor;

    /// Open (or create) a store under `config.directory`, bounded to
    /// `config.max_size` bytes, holding `slots_per_record` byte streams per
    /// record. Records written under a different `format_version` are
    /// discarded as stale.
    fn open(config: &StorageConfig, format_version: u32, slots_per_record: usize)
    -> io::Result<Self>;

    /// Read snapshot of the committed record for `key`, or `None` if the key
    /// holds no record.
    fn get(&self, key: &str) -> io::Result<Option<Self::Snapshot>>;

    /// Begin a write transaction for `key`. Returns `Ok(None)` when another
    /// editor for the same key is already in flight.
    fn edit(&self, key: &str) -> io::Result<Option<Self::Editor>>;

    /// Drop any record stored for `key`. Returns whether one existed;
    /// removing an absent key is not an error.
    fn remove(&self, key: &str) -> io::Result<bool>;

    /// Force pending writes to durable storage.
    fn flush(&self) -> io::Result<()>;

    /// Release the store's resources. The store is unusable afterwards.
    fn close(&self) -> io::Result<()>;

    /// Destroy every stored record and the store's on-disk state.
    fn delete(&self) -> io::Result<()>;
}

/// Read handle over one committed record.
///
/// Dropping the snapshot releases the store's read handle; the adapter
/// arranges for a `get`-returned entry to own its snapshot so that dropping
/// the entry frees the key for removal or rewriting.
pub trait Snapshot: Send + 'static {
    /// Reader over the bytes committed to `slot`.
    fn reader(&self, slot: usize) -> io::Result<Box<dyn Read + Send + '_>>;

    /// Length in bytes of `slot`, as recorded by the store.
    fn len(&self, slot: usize) -> u64;
}

/// Write transaction staging one record's slots before an atomic commit.
///
/// `commit` and `abort` consume the editor, so no transaction can outlive
/// the call that opened it. Implementations must abort on drop if neither
/// was called.
pub trait Editor: Send {
    /// Writer staging the bytes for `slot`. Nothing staged is visible to
    /// readers before [`commit`](Editor::commit).
    fn writer(&mut self, slot: usize) -> io::Result<Box<dyn Write + Send + '_>>;

    /// Publish every staged slot atomically.
    fn commit(self) -> io::Result<()>;

    /// Discard every staged slot, leaving any prior record untouched.
    fn abort(self) -> io::Result<()>;
}
