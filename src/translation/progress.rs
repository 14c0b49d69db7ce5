/*!
 * Persistent translation progress snapshots.
 *
 * Progress lives in a JSON file next to the input document. Every save
 * rewrites the complete snapshot through a temporary file in the same
 * directory, so a crash mid-write can never leave a truncated snapshot
 * behind. On resume the snapshot is loaded back and its units are
 * replayed without touching the backend.
 */

use log::warn;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;

/// Snapshot format version, bumped on incompatible layout changes
const SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot layout
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    /// Format version
    version: u32,

    /// SHA-256 of the source document the units came from
    source_digest: String,

    /// Translated units in document order
    units: Vec<String>,
}

/// Store for translation progress snapshots
pub struct ProgressStore {
    /// Snapshot file location
    path: PathBuf,

    /// Digest of the source document this run is translating
    source_digest: String,
}

impl ProgressStore {
    /// Create a store bound to a snapshot path and a source document
    pub fn new(path: PathBuf, source: &[u8]) -> Self {
        Self {
            path,
            source_digest: hash_bytes(source),
        }
    }

    /// Snapshot file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot file is present on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persist a complete snapshot, replacing any previous one
    pub fn save(&self, units: &[String]) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            source_digest: self.source_digest.clone(),
            units: units.to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| self.save_error(e.to_string()))?;

        // Write into the snapshot's own directory so the final rename
        // stays on one filesystem
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| self.save_error(e.to_string()))?;
        file.write_all(json.as_bytes())
            .map_err(|e| self.save_error(e.to_string()))?;
        file.persist(&self.path)
            .map_err(|e| self.save_error(e.to_string()))?;

        Ok(())
    }

    /// Load a previously saved snapshot
    ///
    /// Fails when the file is missing, unreadable or structurally invalid.
    /// A digest mismatch only logs a warning, so a touched-up source file
    /// does not throw away hours of translation work.
    pub fn load(&self) -> Result<Vec<String>, StoreError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| self.load_error(e.to_string()))?;

        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|e| self.load_error(format!("invalid snapshot: {}", e)))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(self.load_error(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        if snapshot.source_digest != self.source_digest {
            warn!(
                "Progress snapshot {} was created from a different source document, replaying it anyway",
                self.path.display()
            );
        }

        Ok(snapshot.units)
    }

    fn save_error(&self, reason: String) -> StoreError {
        StoreError::SaveFailed {
            path: self.path.clone(),
            reason,
        }
    }

    fn load_error(&self, reason: String) -> StoreError {
        StoreError::LoadFailed {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Compute the SHA-256 hex digest of a byte slice
fn hash_bytes(source: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source);
    format!("{:x}", hasher.finalize())
}
