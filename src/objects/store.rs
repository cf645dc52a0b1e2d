//! Content-addressed object store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::oid::{Oid, OID_HEX_LEN};
use crate::error::{Error, Result};
use crate::infra::{hash_bytes, read_file, write_file_atomic};

/// A write-once store of objects keyed by their content hash.
///
/// Every object lives in its own file directly under the objects directory,
/// named by the 40-character hex form of its hash and holding the object's
/// raw bytes. There is no update or delete.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// Path to the objects directory (e.g., `.zerovc/objects`).
    objects_dir: PathBuf,
}

impl ObjectStore {
    /// Creates a new ObjectStore rooted at the given objects directory.
    pub fn new<P: AsRef<Path>>(objects_dir: P) -> Self {
        ObjectStore {
            objects_dir: objects_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the path of the file holding the object with this Oid.
    pub fn oid_to_path(&self, oid: &Oid) -> PathBuf {
        self.objects_dir.join(oid.to_hex())
    }

    /// Stores `content` and returns its hash.
    ///
    /// Writing content that is already present is a no-op that returns the
    /// same hash.
    pub fn put(&self, content: &[u8]) -> Result<Oid> {
        let oid = Oid::from_bytes(hash_bytes(content));

        let path = self.oid_to_path(&oid);
        if path.exists() {
            debug!(oid = %oid, "object already stored");
            return Ok(oid);
        }

        write_file_atomic(&path, content)?;
        debug!(oid = %oid, size = content.len(), "stored object");

        Ok(oid)
    }

    /// Reads the bytes of the object with the given hash.
    ///
    /// # Errors
    ///
    /// `Error::ObjectNotFound` if no such object exists.
    pub fn get(&self, oid: &Oid) -> Result<Vec<u8>> {
        let path = self.oid_to_path(oid);
        read_file(&path).map_err(|e| {
            if matches!(e, Error::PathNotFound(_)) {
                Error::ObjectNotFound(oid.to_hex())
            } else {
                e
            }
        })
    }

    /// Checks if an object exists in the store.
    pub fn exists(&self, oid: &Oid) -> bool {
        self.oid_to_path(oid).is_file()
    }

    /// Finds objects whose hash starts with the given hex prefix.
    ///
    /// The prefix must be at least 4 hex characters. Matching is
    /// case-insensitive and the result is sorted.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<Oid>> {
        if prefix.len() < 4 || prefix.len() > OID_HEX_LEN {
            return Err(Error::InvalidOid(prefix.to_string()));
        }

        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidOid(prefix.to_string()));
        }

        let prefix_lower = prefix.to_lowercase();

        if !self.objects_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in fs::read_dir(&self.objects_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            // Temporary files from interrupted writes start with '.'
            if name.len() == OID_HEX_LEN && name.starts_with(&prefix_lower) {
                if let Ok(oid) = Oid::from_hex(&name) {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}
