// Record store: whole-table CSV persistence with load-or-initialize semantics

use crate::csv;
use crate::models::RepairRecord;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Backing file name, relative to the store base directory.
pub const DATA_FILE: &str = "deen_inventory.csv";

/// Evidence directory name, relative to the store base directory.
pub const EVIDENCE_DIR: &str = "repair_evidence";

/// Storage failures. Both are unrecoverable at the point they occur: the
/// current operation aborts and the error surfaces to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file exists but is not readable as the expected table
    /// (I/O failure, malformed encoding, mismatched columns).
    #[error("cannot read backing file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O failure while overwriting the backing file or writing an
    /// evidence blob.
    #[error("cannot write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub(crate) fn read(path: &Path, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Read {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: &Path, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Write {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn schema_mismatch(path: &Path, found: &::csv::StringRecord) -> Self {
        StoreError::read(path, format!("unexpected columns: {:?}", found))
    }
}

/// Durable whole-table store for repair records.
///
/// Constructed once at process start and injected into every handler.
/// The contract is read whole table, mutate in memory, write whole table
/// back: one expected writer, last writer wins.
pub struct RecordStore {
    data_path: PathBuf,
    evidence_dir: PathBuf,
}

impl RecordStore {
    /// Create a store rooted at `base`. Touches nothing on disk; the
    /// backing file appears on first persist, the evidence directory on
    /// first upload.
    pub fn new<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        Self {
            data_path: base.join(DATA_FILE),
            evidence_dir: base.join(EVIDENCE_DIR),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn evidence_dir(&self) -> &Path {
        &self.evidence_dir
    }

    /// Load the full table, or an empty one if the backing file does not
    /// exist yet. Loading never creates the file.
    pub fn load(&self) -> Result<Vec<RepairRecord>, StoreError> {
        csv::read_table(&self.data_path)
    }

    /// Append `record` at the end of `table`. Pure in-memory operation:
    /// insertion order preserved, no deduplication, nothing persisted.
    pub fn append(mut table: Vec<RepairRecord>, record: RepairRecord) -> Vec<RepairRecord> {
        table.push(record);
        table
    }

    /// Overwrite the entire backing file with `table`.
    ///
    /// Deliberately not atomic (no temp-file-then-rename, no lock): a
    /// concurrent persist is last-writer-wins, which is the documented
    /// single-writer contract of this store.
    pub fn persist(&self, table: &[RepairRecord]) -> Result<(), StoreError> {
        csv::write_table(&self.data_path, table)?;
        info!(file = ?self.data_path, rows = table.len(), "table persisted");
        Ok(())
    }

    /// Write an evidence blob as `{evidence_dir}/{%Y%m%d_%H%M%S}_{name}`
    /// and return the stored path string.
    ///
    /// The directory is created lazily on first need. Evidence files are
    /// never read back or deleted by this system; only the path travels
    /// into the record that references it.
    pub fn save_evidence(
        &self,
        bytes: &[u8],
        original_name: &str,
        now: NaiveDateTime,
    ) -> Result<String, StoreError> {
        if !self.evidence_dir.exists() {
            fs::create_dir_all(&self.evidence_dir)
                .map_err(|e| StoreError::write(&self.evidence_dir, e))?;
            debug!(dir = ?self.evidence_dir, "created evidence directory");
        }

        let filename = format!("{}_{}", now.format("%Y%m%d_%H%M%S"), original_name);
        let path = self.evidence_dir.join(filename);
        fs::write(&path, bytes).map_err(|e| StoreError::write(&path, e))?;
        info!(file = ?path, size = bytes.len(), "evidence saved");

        Ok(path.to_string_lossy().into_owned())
    }
}
