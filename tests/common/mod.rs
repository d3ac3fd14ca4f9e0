//! In-memory [`Store`] double for integration tests.
//!
//! Honors the documented store contract strictly: atomic commit visibility,
//! independent concurrent snapshots, at most one in-flight editor per key
//! (later editors declined via `Ok(None)`), and busy failures when a key
//! with open read handles is edited or removed. Handle bookkeeping is
//! exposed so tests can observe releases.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use httpstash::config::StorageConfig;
use httpstash::store::{Editor, Snapshot, Store};

#[derive(Default)]
struct State {
    records: HashMap<String, [Vec<u8>; 2]>,
    editing: HashSet<String>,
    open_snapshots: HashMap<String, usize>,
    closed: bool,
}

impl State {
    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            Err(io::Error::other("store closed"))
        } else {
            Ok(())
        }
    }
}

/// Shared in-memory store; clones see the same records.
#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<State>>,
}

impl MemStore {
    pub fn snapshot_count(&self, key: &str) -> usize {
        *self
            .state
            .lock()
            .unwrap()
            .open_snapshots
            .get(key)
            .unwrap_or(&0)
    }

    pub fn is_editing(&self, key: &str) -> bool {
        self.state.lock().unwrap().editing.contains(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.state.lock().unwrap().records.contains_key(key)
    }

    pub fn record_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }
}

impl Store for MemStore {
    type Snapshot = MemSnapshot;
    type Editor = MemEditor;

    fn open(
        _config: &StorageConfig,
        _format_version: u32,
        slots_per_record: usize,
    ) -> io::Result<Self> {
        assert_eq!(slots_per_record, 2, "double models two-slot records only");
        Ok(Self::default())
    }

    fn get(&self, key: &str) -> io::Result<Option<MemSnapshot>> {
        let mut state = self.state.lock().unwrap();
        state.check_open()?;
        let Some(slots) = state.records.get(key).cloned() else {
            return Ok(None);
        };
        *state.open_snapshots.entry(key.to_owned()).or_insert(0) += 1;
        Ok(Some(MemSnapshot {
            key: key.to_owned(),
            slots,
            state: Arc::clone(&self.state),
        }))
    }

    fn edit(&self, key: &str) -> io::Result<Option<MemEditor>> {
        let mut state = self.state.lock().unwrap();
        state.check_open()?;
        if state.editing.contains(key) {
            return Ok(None);
        }
        if state.open_snapshots.get(key).copied().unwrap_or(0) > 0 {
            return Err(io::Error::other("resource busy: open snapshot"));
        }
        state.editing.insert(key.to_owned());
        Ok(Some(MemEditor {
            key: key.to_owned(),
            staged: [None, None],
            state: Arc::clone(&self.state),
            finished: false,
        }))
    }

    fn remove(&self, key: &str) -> io::Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.check_open()?;
        if state.editing.contains(key) {
            return Err(io::Error::other("resource busy: edit in flight"));
        }
        if state.open_snapshots.get(key).copied().unwrap_or(0) > 0 {
            return Err(io::Error::other("resource busy: open snapshot"));
        }
        Ok(state.records.remove(key).is_some())
    }

    fn flush(&self) -> io::Result<()> {
        self.state.lock().unwrap().check_open()
    }

    fn close(&self) -> io::Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }

    fn delete(&self) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.records.clear();
        state.closed = true;
        Ok(())
    }
}

/// Read handle over one committed record; counts itself open until dropped.
pub struct MemSnapshot {
    key: String,
    slots: [Vec<u8>; 2],
    state: Arc<Mutex<State>>,
}

impl Snapshot for MemSnapshot {
    fn reader(&self, slot: usize) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(io::Cursor::new(self.slots[slot].clone())))
    }

    fn len(&self, slot: usize) -> u64 {
        self.slots[slot].len() as u64
    }
}

impl Drop for MemSnapshot {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap();
        if let Some(count) = state.open_snapshots.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                state.open_snapshots.remove(&self.key);
            }
        }
    }
}

/// Staging editor; publishes on commit, otherwise leaves the prior record
/// untouched. Aborts on drop if neither commit nor abort was called.
pub struct MemEditor {
    key: String,
    staged: [Option<Vec<u8>>; 2],
    state: Arc<Mutex<State>>,
    finished: bool,
}

impl Editor for MemEditor {
    fn writer(&mut self, slot: usize) -> io::Result<Box<dyn Write + Send + '_>> {
        Ok(Box::new(self.staged[slot].insert(Vec::new())))
    }

    fn commit(mut self) -> io::Result<()> {
        let [staged_meta, staged_body] = std::mem::take(&mut self.staged);
        let mut state = self.state.lock().unwrap();
        let [prior_meta, prior_body] = state.records.remove(&self.key).unwrap_or_default();
        state.records.insert(
            self.key.clone(),
            [
                staged_meta.unwrap_or(prior_meta),
                staged_body.unwrap_or(prior_body),
            ],
        );
        state.editing.remove(&self.key);
        drop(state);
        self.finished = true;
        Ok(())
    }

    fn abort(mut self) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.editing.remove(&self.key);
        drop(state);
        self.finished = true;
        Ok(())
    }
}

impl Drop for MemEditor {
    fn drop(&mut self) {
        if !self.finished {
            self.state.lock().unwrap().editing.remove(&self.key);
        }
    }
}
