//! Local fallback cache.
//!
//! Appends records to per-session `{dir}/{session_id}.jsonl` files with
//! `serde_jsonlines::append_json_lines`. The newest line for a key wins on
//! read. Lines that fail to parse (a write torn by a crash, hand edits) are
//! skipped with a warning so one bad line never hides the rest of a session.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::RecordStore;
use crate::error::StoreError;
use crate::record::{RecordKey, StoredRecord};

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    /// Point the cache at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &RecordKey) -> Result<PathBuf, StoreError> {
        key.validate()?;
        Ok(self.dir.join(format!("{}.jsonl", key.session_id)))
    }

    /// Append `record` synchronously. Returns once the line is written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] for an unsafe session id and
    /// [`StoreError::Io`] when the directory or file cannot be written.
    pub fn write(&self, record: &StoredRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.key)?;
        std::fs::create_dir_all(&self.dir)?;
        serde_jsonlines::append_json_lines(&path, [record])?;
        debug!(key = %record.key, path = %path.display(), "cached record locally");
        Ok(())
    }

    /// The most recently appended record for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] for an unsafe session id and
    /// [`StoreError::Io`] for read failures other than a missing file.
    pub fn read(&self, key: &RecordKey) -> Result<Option<StoredRecord>, StoreError> {
        let path = self.path_for(key)?;
        let lines = match serde_jsonlines::json_lines::<StoredRecord, _>(&path) {
            Ok(lines) => lines,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut latest = None;
        for (line_no, line) in lines.enumerate() {
            match line {
                Ok(record) if record.key == *key => latest = Some(record),
                Ok(_) => {}
                Err(e) if matches!(e.kind(), ErrorKind::InvalidData | ErrorKind::UnexpectedEof) => {
                    warn!(path = %path.display(), line = line_no + 1, error = %e, "skipping unreadable cache line");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(latest)
    }

    /// Every readable record for a session, in file order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read`].
    pub fn records(&self, session_id: &str) -> Result<Vec<StoredRecord>, StoreError> {
        let path = self.path_for(&RecordKey::envelope(session_id))?;
        let lines = match serde_jsonlines::json_lines::<StoredRecord, _>(&path) {
            Ok(lines) => lines,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut out = Vec::new();
        for line in lines {
            match line {
                Ok(record) => out.push(record),
                Err(e) if matches!(e.kind(), ErrorKind::InvalidData | ErrorKind::UnexpectedEof) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(out)
    }
}

impl RecordStore for LocalCache {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn put(&self, record: &StoredRecord) -> Result<(), StoreError> {
        self.write(record)
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<StoredRecord>, StoreError> {
        self.read(key)
    }
}
