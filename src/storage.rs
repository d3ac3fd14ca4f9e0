//! Storage adapter over an LRU store.
//!
//! [`DiskLruStorage`] composes the store's transactional primitives into the
//! get/put/remove/update surface the HTTP caching layer consumes. Every
//! operation derives the store key from the caller's identifier first, then
//! delegates: reads borrow a snapshot, writes stage both record slots inside
//! an editor and commit or abort as a unit.
//!
//! The adapter is stateless and reentrant; it holds no locks and performs no
//! retries. Same-key write serialization, concurrent-reader safety, and
//! commit atomicity are the store's documented obligations (see
//! [`Store`](crate::Store)).

use tracing::{debug, trace};

use crate::config::StorageConfig;
use crate::entry::CacheEntry;
use crate::error::{Result, UpdateRejected};
use crate::key::derive_key;
use crate::record::{self, FORMAT_VERSION, SLOT_BODY, SLOT_COUNT, SLOT_METADATA};
use crate::store::{Editor, Store};

const LOG_TARGET: &str = "httpstash::storage";

/// HTTP cache entry storage backed by a disk LRU store.
pub struct DiskLruStorage<S: Store> {
    store: S,
}

impl<S: Store> DiskLruStorage<S> {
    /// Open the underlying store per `config` and wrap it.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let store = S::open(config, FORMAT_VERSION, SLOT_COUNT)?;
        Ok(Self { store })
    }

    /// Wrap an already-opened store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Look up the entry stored under `identifier`.
    ///
    /// An absent key is `Ok(None)`, not a failure. The returned entry owns a
    /// read snapshot; drop it to release the store's handle.
    pub fn get_entry(&self, identifier: &str) -> Result<Option<CacheEntry>> {
        let key = derive_key(identifier);
        let Some(snapshot) = self.store.get(key.as_str())? else {
            trace!(target: LOG_TARGET, %key, "miss");
            return Ok(None);
        };
        match record::read_entry(snapshot) {
            Ok(entry) => {
                trace!(target: LOG_TARGET, %key, "hit");
                Ok(Some(entry))
            }
            Err(err) => {
                // read_entry already released the snapshot.
                debug!(target: LOG_TARGET, %key, error = %err, "failed to decode record");
                Err(err)
            }
        }
    }

    /// Store `entry` under `identifier`, replacing any prior record.
    ///
    /// If another writer already holds the key, the store declines the edit
    /// and the call is a silent no-op. On any write failure the transaction
    /// is aborted — no partial record becomes visible — and the failure
    /// propagates.
    pub fn put_entry(&self, identifier: &str, entry: &CacheEntry) -> Result<()> {
        let key = derive_key(identifier);
        let Some(mut editor) = self.store.edit(key.as_str())? else {
            debug!(target: LOG_TARGET, %key, "write in flight, skipping put");
            return Ok(());
        };
        match write_record(&mut editor, entry) {
            Ok(()) => {
                editor.commit()?;
                trace!(target: LOG_TARGET, %key, body_len = entry.body().len(), "committed");
                Ok(())
            }
            Err(err) => {
                if let Err(abort_err) = editor.abort() {
                    debug!(target: LOG_TARGET, %key, error = %abort_err, "abort failed");
                }
                Err(err)
            }
        }
    }

    /// Drop any record stored under `identifier`. Absent keys are fine.
    pub fn remove_entry(&self, identifier: &str) -> Result<()> {
        let key = derive_key(identifier);
        self.store.remove(key.as_str())?;
        Ok(())
    }

    /// Read-modify-write the entry stored under `identifier`.
    ///
    /// `update` receives the current entry (or `None`) and returns the
    /// replacement, which is written via [`put_entry`](Self::put_entry) with
    /// the same contention no-op semantics. A rejection from `update`
    /// surfaces without any write.
    ///
    /// Not isolated against concurrent writers of the same key: another
    /// writer may commit between the read and the write here, and the later
    /// write wins. Callers needing stronger guarantees must serialize their
    /// own updates.
    pub fn update_entry<F>(&self, identifier: &str, update: F) -> Result<()>
    where
        F: FnOnce(Option<CacheEntry>) -> Result<CacheEntry, UpdateRejected>,
    {
        let existing = self.get_entry(identifier)?;
        let updated = update(existing)?;
        self.put_entry(identifier, &updated)
    }

    /// Persist the store's pending writes.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()?;
        Ok(())
    }

    /// Close the underlying store.
    pub fn close(&self) -> Result<()> {
        self.store.close()?;
        Ok(())
    }

    /// Destroy every stored record.
    pub fn delete(&self) -> Result<()> {
        self.store.delete()?;
        Ok(())
    }
}

/// Stage both record slots into `editor`. Commit stays with the caller.
fn write_record<E: Editor>(editor: &mut E, entry: &CacheEntry) -> Result<()> {
    record::write_metadata(editor.writer(SLOT_METADATA)?, entry)?;
    record::write_body(editor.writer(SLOT_BODY)?, entry.body())?;
    Ok(())
}
