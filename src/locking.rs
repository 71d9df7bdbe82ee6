//! Optional per-id write locks.
//!
//! Update and delete derive a note's sheet row with a fresh scan and then
//! write to that row without any server-side atomicity. A concurrent
//! create or delete landing between the scan and the write shifts the rows
//! and the write hits the wrong one. That window is inherent to the
//! protocol; these locks only serialize update/delete calls for the same
//! id within one process, which narrows the window but cannot close it
//! across processes. Enabled via `SheetsApiConfig::with_write_locking`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct IdLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl IdLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding writes for `id`, created on first use.
    /// Entries are never evicted; note ids are few and short-lived maps
    /// would reintroduce the race between lookup and lock.
    pub fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
