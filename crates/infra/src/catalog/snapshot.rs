//! Point-in-time persistence of the whole catalog to a single file.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{error, info, warn};

use shopfront_core::DomainError;
use shopfront_products::ItemKey;

use super::CatalogEntry;

/// Current on-disk format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot file not found at {path}")]
    Missing { path: PathBuf },

    #[error("snapshot io at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("snapshot format at {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported snapshot version {found} (expected {})", SNAPSHOT_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("catalog lock poisoned")]
    Poisoned,
}

impl From<SnapshotError> for DomainError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Missing { .. } | SnapshotError::Io { .. } => {
                DomainError::io(err.to_string())
            }
            SnapshotError::Format { .. } | SnapshotError::UnsupportedVersion { .. } => {
                DomainError::serialization(err.to_string())
            }
            SnapshotError::Poisoned => DomainError::unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    entries: Vec<CatalogEntry>,
}

/// The snapshot file plus the critical section that serializes writers.
///
/// `save` holds `write_guard` for the whole copy-serialize-write sequence;
/// the catalog's reader/writer lock is only held while copying.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy `entries`, then overwrite the snapshot file with the copy.
    ///
    /// Returns the number of entries written.
    pub fn save(&self, entries: &RwLock<HashMap<ItemKey, CatalogEntry>>) -> Result<usize, SnapshotError> {
        // A poisoned guard only means an earlier save panicked; the file is
        // replaced wholesale, so there is no state to distrust.
        let _section = self.write_guard.lock().unwrap_or_else(|p| p.into_inner());

        let mut copy: Vec<CatalogEntry> = {
            let map = entries.read().map_err(|_| SnapshotError::Poisoned)?;
            map.values().cloned().collect()
        };
        copy.sort_by(|a, b| a.item.key().cmp(b.item.key()));

        let count = copy.len();
        let doc = SnapshotDocument {
            version: SNAPSHOT_VERSION,
            entries: copy,
        };
        let bytes = serde_json::to_vec_pretty(&doc).map_err(|source| SnapshotError::Format {
            path: self.path.clone(),
            source,
        })?;

        self.write_atomically(&bytes)?;
        Ok(count)
    }

    /// Write to a uniquely named sibling temp file, then rename it over the
    /// snapshot so readers never observe a partial document.
    ///
    /// Each save gets its own temp file, so catalogs sharing a snapshot path
    /// cannot truncate each other's in-flight write.
    fn write_atomically(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_at(dir))?;
        tmp.write_all(bytes).map_err(io_at(tmp.path()))?;
        tmp.as_file().sync_all().map_err(io_at(tmp.path()))?;
        tmp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| SnapshotError::Io {
                path: self.path.clone(),
                source: e.error,
            })
    }

    /// Read and validate the snapshot file.
    pub fn load(&self) -> Result<Vec<CatalogEntry>, SnapshotError> {
        let bytes = fs::read(&self.path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SnapshotError::Missing {
                path: self.path.clone(),
            },
            _ => SnapshotError::Io {
                path: self.path.clone(),
                source,
            },
        })?;

        let doc: SnapshotDocument =
            serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Format {
                path: self.path.clone(),
                source,
            })?;
        if doc.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: doc.version });
        }
        Ok(doc.entries)
    }

    /// Load the snapshot as a catalog mapping.
    ///
    /// Never fails: any problem is logged and yields an empty mapping.
    pub fn restore(&self) -> HashMap<ItemKey, CatalogEntry> {
        let entries = match self.load() {
            Ok(entries) => entries,
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "failed to restore catalog snapshot");
                return HashMap::new();
            }
        };

        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            let key = entry.item.key().clone();
            if map.contains_key(&key) {
                warn!(item = %key, "duplicate snapshot entry ignored");
                continue;
            }
            map.insert(key, entry);
        }
        info!(path = %self.path.display(), items = map.len(), "catalog snapshot restored");
        map
    }
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> SnapshotError {
    let path = path.to_path_buf();
    move |source| SnapshotError::Io { path, source }
}
