//! In-process record store.
//!
//! Clones share the same map, so a test can keep a handle, switch the store
//! off to simulate an outage, and inspect what arrived.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::RecordStore;
use crate::error::StoreError;
use crate::record::{RecordKey, StoredRecord};

#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<RecordKey, StoredRecord>>>,
    available: Arc<AtomicBool>,
    puts: Arc<AtomicUsize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
            puts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Switch the store on or off. While off every call fails with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Number of successful puts since creation.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Read without the availability check.
    #[must_use]
    pub fn snapshot(&self, key: &RecordKey) -> Option<StoredRecord> {
        self.lock().get(key).cloned()
    }

    /// Insert without the availability check or counting.
    pub fn seed(&self, record: StoredRecord) {
        self.lock().insert(record.key.clone(), record);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RecordKey, StoredRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store switched off".into()))
        }
    }
}

impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, record: &StoredRecord) -> Result<(), StoreError> {
        self.check()?;
        record.key.validate()?;
        self.lock().insert(record.key.clone(), record.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<StoredRecord>, StoreError> {
        self.check()?;
        Ok(self.lock().get(key).cloned())
    }
}
