//! # calm-store
//!
//! Persistence for assessment sessions. Domain data is mirrored, never
//! interpreted: every value travels as a [`StoredRecord`] keyed by session
//! id and record kind.
//!
//! - [`RemoteStore`]: the network backend (`/assessment/{session_id}[/{step}]`)
//! - [`LocalCache`]: per-session JSONL files, written synchronously
//! - [`MemoryStore`]: an in-process store with an on/off switch
//! - [`TieredStore`]: a primary plus the local cache behind one interface

pub mod error;
pub mod http;
pub mod local;
pub mod memory;
pub mod record;
pub mod remote;
pub mod tiered;

use std::future::Future;

pub use error::StoreError;
pub use local::LocalCache;
pub use memory::MemoryStore;
pub use record::{RECORD_VERSION, RecordKey, RecordKind, StoredRecord};
pub use remote::RemoteStore;
pub use tiered::{Lookup, Source, TieredStore, WriteOutcome};

/// A keyed record store.
pub trait RecordStore: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Store `record`, replacing any previous record with the same key.
    fn put(&self, record: &StoredRecord) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The latest record for `key`, or `None` if the store has none.
    fn get(
        &self,
        key: &RecordKey,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StoreError>> + Send;
}
