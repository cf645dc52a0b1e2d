//! The staging index.
//!
//! The index file (`.zerovc/index`) is a JSON array of `{path, hash}`
//! entries in the order they were staged. It is emptied by every commit.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::objects::Oid;

/// A staged file: the path it was added under and the hash of its content.
///
/// The same type is recorded verbatim in each commit's file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    path: String,
    hash: Oid,
}

impl IndexEntry {
    /// Creates a new entry.
    pub fn new(path: impl Into<String>, hash: Oid) -> Self {
        IndexEntry {
            path: path.into(),
            hash,
        }
    }

    /// Returns the path the file was staged under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the hash of the staged content.
    pub fn hash(&self) -> &Oid {
        &self.hash
    }
}

/// An ordered list of staged entries.
///
/// Entries are kept in insertion order. Staging the same path twice keeps
/// both entries unless [`Index::upsert`] is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Creates an empty index.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses the on-disk form of the index.
    ///
    /// # Errors
    ///
    /// `Error::CorruptIndex` if the data is not a JSON array of entries with
    /// valid hashes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let entries: Vec<IndexEntry> =
            serde_json::from_slice(data).map_err(|e| Error::CorruptIndex(e.to_string()))?;
        Ok(Index { entries })
    }

    /// Serializes the index to its on-disk form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.entries).map_err(|e| Error::CorruptIndex(e.to_string()))
    }

    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a slice of all entries in staging order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Returns the first entry staged under `path`.
    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Appends an entry at the end, keeping any earlier entry for the same path.
    pub fn append(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Replaces the hash of an already staged path in place, or appends the
    /// entry if the path is not staged yet.
    ///
    /// Later duplicates of the path, if any, are dropped.
    pub fn upsert(&mut self, entry: IndexEntry) {
        match self.entries.iter().position(|e| e.path == entry.path) {
            Some(pos) => {
                self.entries[pos].hash = entry.hash;
                let path = entry.path;
                let mut seen = false;
                self.entries.retain(|e| {
                    if e.path != path {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.entries.push(entry),
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
