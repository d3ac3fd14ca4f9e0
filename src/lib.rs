//! Disk-backed HTTP cache storage.
//!
//! `httpstash` persists structured HTTP response cache entries — request and
//! response dates, status line, ordered headers, variant map, and body — into
//! a bounded disk LRU key-value store, and reconstructs them on the way back
//! out. Cache semantics (freshness, revalidation, variant negotiation) belong
//! to the HTTP caching layer above; eviction, journaling, and crash recovery
//! belong to the [`Store`] implementation below. This crate owns the contract
//! between the two: deterministic key derivation, the two-slot record codec,
//! and the transactional composition of reads and writes.
//!
//! Each logical entry becomes one record with two fixed slots: slot 0 holds
//! newline-delimited UTF-8 metadata, slot 1 holds the raw body bytes. A write
//! stages both slots inside a store [`Editor`] and commits them atomically;
//! a read borrows a store [`Snapshot`] and exposes the body lazily, releasing
//! the snapshot when the returned entry is dropped.
//!
//! The adapter itself is stateless and reentrant. All cross-thread
//! coordination is delegated to the [`Store`] contract, which documents the
//! guarantees this crate relies on.

pub mod config;
pub mod entry;
pub mod error;
pub mod key;
pub mod record;
pub mod storage;
pub mod store;

pub use config::StorageConfig;
pub use entry::{CacheEntry, EpochMillis, Header, HeapResource, Resource, StatusLine};
pub use error::{Result, StorageError, UpdateRejected};
pub use key::{StoreKey, derive_key};
pub use record::{FORMAT_VERSION, SLOT_BODY, SLOT_COUNT, SLOT_METADATA};
pub use storage::DiskLruStorage;
pub use store::{Editor, Snapshot, Store};
