//! Primary + local fallback composed behind one interface.
//!
//! Writes go to the local cache first, synchronously, then to the primary.
//! A failed primary write is kept in an in-memory outbox and retried, oldest
//! first, before the next primary write. A record the primary rejects
//! outright (see [`StoreError::is_permanent`]) is parked instead, so it cannot
//! hold up the rest of the queue. Reads consult both tiers and return
//! the newer record. Primary failures are logged and never surfaced as
//! errors while the local tier can answer.

use std::collections::VecDeque;

use calm_config::CalmConfig;
use serde::Serialize;
use tracing::{debug, warn};

use crate::RecordStore;
use crate::error::StoreError;
use crate::local::LocalCache;
use crate::record::{RecordKey, StoredRecord};
use crate::remote::RemoteStore;

/// How durable a write ended up. Informational: callers log it and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Written to both tiers.
    Replicated,
    /// Written locally; no primary is configured.
    LocalOnly,
    /// One tier failed, the other holds the record. A failed primary write
    /// is queued for retry.
    Degraded { reason: String },
    /// Neither tier holds the record. The in-memory state is the only copy.
    Unpersisted { reason: String },
}

impl WriteOutcome {
    /// True when at least one durable tier holds the record.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        !matches!(self, Self::Unpersisted { .. })
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. } | Self::Unpersisted { .. })
    }
}

/// Which tier answered a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Primary,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub record: StoredRecord,
    pub source: Source,
}

pub struct TieredStore<P: RecordStore = RemoteStore> {
    primary: Option<P>,
    local: LocalCache,
    outbox: VecDeque<StoredRecord>,
    parked: Vec<StoredRecord>,
}

impl TieredStore<RemoteStore> {
    /// Build from config: the remote tier only when `remote.base_url` is set.
    #[must_use]
    pub fn from_config(config: &CalmConfig) -> Self {
        let local = LocalCache::new(config.cache.resolved_dir());
        if config.remote.is_configured() {
            Self::new(Some(RemoteStore::from_config(&config.remote)), local)
        } else {
            Self::local_only(local)
        }
    }
}

impl<P: RecordStore> TieredStore<P> {
    pub const fn new(primary: Option<P>, local: LocalCache) -> Self {
        Self {
            primary,
            local,
            outbox: VecDeque::new(),
            parked: Vec::new(),
        }
    }

    pub const fn local_only(local: LocalCache) -> Self {
        Self::new(None, local)
    }

    #[must_use]
    pub const fn local(&self) -> &LocalCache {
        &self.local
    }

    #[must_use]
    pub const fn primary(&self) -> Option<&P> {
        self.primary.as_ref()
    }

    /// Records waiting for the primary.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.outbox.len()
    }

    /// Records the primary rejected permanently. They remain in the local
    /// cache but are not retried.
    #[must_use]
    pub fn parked_writes(&self) -> &[StoredRecord] {
        &self.parked
    }

    fn park(&mut self, record: StoredRecord) {
        self.outbox.retain(|queued| queued.key != record.key);
        self.parked.retain(|parked| parked.key != record.key);
        self.parked.push(record);
    }

    /// Queue a record for the primary, replacing any older queued copy of
    /// the same key.
    fn enqueue(&mut self, record: StoredRecord) {
        self.outbox.retain(|queued| queued.key != record.key);
        self.outbox.push_back(record);
    }

    /// Push queued records to the primary, oldest first, stopping at the
    /// first retryable failure. Permanently rejected records are parked and
    /// skipped. Returns how many were delivered.
    ///
    /// # Errors
    ///
    /// Returns the primary's error for the first record it could not take
    /// right now; that record and everything after it stay queued.
    pub async fn flush_outbox(&mut self) -> Result<usize, StoreError> {
        let Some(primary) = &self.primary else {
            return Ok(0);
        };
        let mut delivered = 0;
        while let Some(record) = self.outbox.front() {
            let sent = primary.put(record).await;
            match sent {
                Ok(()) => {
                    debug!(key = %record.key, "delivered queued record");
                    self.outbox.pop_front();
                    delivered += 1;
                }
                Err(e) if e.is_permanent() => {
                    warn!(key = %record.key, error = %e, "primary rejected queued record; parked");
                    if let Some(record) = self.outbox.pop_front() {
                        self.parked.push(record);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(delivered)
    }

    /// Write `record` to both tiers. Never fails; see [`WriteOutcome`].
    pub async fn put(&mut self, record: StoredRecord) -> WriteOutcome {
        let local = self.local.write(&record);
        if let Err(e) = &local {
            warn!(key = %record.key, error = %e, "local cache write failed");
        }

        if self.primary.is_none() {
            return match local {
                Ok(()) => WriteOutcome::LocalOnly,
                Err(e) => WriteOutcome::Unpersisted {
                    reason: format!("local cache write failed and no remote store is configured: {e}"),
                },
            };
        }

        let remote = match self.flush_outbox().await {
            Ok(_) => match &self.primary {
                Some(primary) => primary.put(&record).await,
                None => Ok(()),
            },
            Err(e) => Err(e),
        };

        match (local, remote) {
            (Ok(()), Ok(())) => WriteOutcome::Replicated,
            (Ok(()), Err(e)) if e.is_permanent() => {
                warn!(key = %record.key, error = %e, "remote store rejected the record; kept locally only");
                self.park(record);
                WriteOutcome::Degraded {
                    reason: format!("remote store rejected the record: {e}"),
                }
            }
            (Ok(()), Err(e)) => {
                warn!(key = %record.key, error = %e, "remote write failed; queued for retry");
                self.enqueue(record);
                WriteOutcome::Degraded {
                    reason: format!("remote store unreachable: {e}"),
                }
            }
            (Err(e), Ok(())) => WriteOutcome::Degraded {
                reason: format!("local cache write failed: {e}"),
            },
            (Err(local_err), Err(remote_err)) => {
                if remote_err.is_permanent() {
                    self.park(record);
                } else {
                    self.enqueue(record);
                }
                WriteOutcome::Unpersisted {
                    reason: format!("local cache: {local_err}; remote store: {remote_err}"),
                }
            }
        }
    }

    /// Serialize `value` and [`put`](Self::put) it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] only; persistence failures are
    /// reported through the [`WriteOutcome`].
    pub async fn put_json<T: Serialize>(
        &mut self,
        key: RecordKey,
        value: &T,
    ) -> Result<WriteOutcome, StoreError> {
        let record = StoredRecord::from_value(key, value)?;
        Ok(self.put(record).await)
    }

    /// Read `key` from both tiers and return the newer record.
    ///
    /// When the primary answers but lacks the local record, or holds an
    /// older one, the local record is queued for upload. A newer primary
    /// record is copied into the local cache.
    ///
    /// # Errors
    ///
    /// Returns an error only when neither tier could be read.
    pub async fn get(&mut self, key: &RecordKey) -> Result<Option<Lookup>, StoreError> {
        key.validate()?;

        let primary = match &self.primary {
            Some(p) => match p.get(key).await {
                Ok(found) => Some(Ok(found)),
                Err(e) => {
                    warn!(key = %key, store = p.name(), error = %e, "primary read failed; using local cache");
                    Some(Err(e))
                }
            },
            None => None,
        };
        let local = match self.local.read(key) {
            Ok(found) => Ok(found),
            Err(e) => {
                warn!(key = %key, error = %e, "local cache read failed");
                Err(e)
            }
        };

        match (primary, local) {
            (None, local) => Ok(local?.map(|record| Lookup {
                record,
                source: Source::Local,
            })),
            (Some(Err(primary_err)), Err(_)) => Err(primary_err),
            (Some(Err(_)), Ok(local)) => Ok(local.map(|record| Lookup {
                record,
                source: Source::Local,
            })),
            (Some(Ok(remote)), Err(_)) => Ok(remote.map(|record| Lookup {
                record,
                source: Source::Primary,
            })),
            (Some(Ok(remote)), Ok(local)) => Ok(self.reconcile(remote, local)),
        }
    }

    fn reconcile(
        &mut self,
        remote: Option<StoredRecord>,
        local: Option<StoredRecord>,
    ) -> Option<Lookup> {
        match (remote, local) {
            (None, None) => None,
            (Some(remote), None) => {
                self.refresh_local(&remote);
                Some(Lookup {
                    record: remote,
                    source: Source::Primary,
                })
            }
            (None, Some(local)) => {
                debug!(key = %local.key, "primary lacks record; queued read repair");
                self.enqueue(local.clone());
                Some(Lookup {
                    record: local,
                    source: Source::Local,
                })
            }
            (Some(remote), Some(local)) => {
                if local.written_at > remote.written_at {
                    debug!(key = %local.key, "local record is newer; queued read repair");
                    self.enqueue(local.clone());
                    Some(Lookup {
                        record: local,
                        source: Source::Local,
                    })
                } else {
                    if remote.written_at > local.written_at {
                        self.refresh_local(&remote);
                    }
                    Some(Lookup {
                        record: remote,
                        source: Source::Primary,
                    })
                }
            }
        }
    }

    fn refresh_local(&self, record: &StoredRecord) {
        if let Err(e) = self.local.write(record) {
            warn!(key = %record.key, error = %e, "could not refresh local cache");
        }
    }
}
