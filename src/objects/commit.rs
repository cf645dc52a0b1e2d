//! Commit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::oid::Oid;
use super::store::ObjectStore;
use crate::error::{Error, Result};
use crate::index::IndexEntry;

/// The stored form of a commit, borrowed for serialization.
#[derive(Serialize)]
struct CommitRecordRef<'a> {
    #[serde(rename = "timeStamp")]
    timestamp: &'a DateTime<Utc>,
    message: &'a str,
    files: &'a [IndexEntry],
    parent: Option<&'a Oid>,
}

/// The stored form of a commit, owned for deserialization.
#[derive(Deserialize)]
struct CommitRecord {
    #[serde(rename = "timeStamp")]
    timestamp: DateTime<Utc>,
    message: String,
    files: Vec<IndexEntry>,
    parent: Option<Oid>,
}

/// A commit: a snapshot of the staged files with a message, a creation
/// time, and at most one parent.
///
/// On disk a commit is a JSON object:
///
/// ```text
/// {"timeStamp":"2024-01-01T09:30:12.345Z","message":"first",
///  "files":[{"path":"a.txt","hash":"f572d3..."}],"parent":null}
/// ```
///
/// and its Oid is the hash of exactly those bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    oid: Oid,
    timestamp: DateTime<Utc>,
    message: String,
    files: Vec<IndexEntry>,
    parent: Option<Oid>,
}

impl Commit {
    /// Serializes a commit record into the bytes that get stored and hashed.
    pub fn format(
        timestamp: &DateTime<Utc>,
        message: &str,
        files: &[IndexEntry],
        parent: Option<&Oid>,
    ) -> Result<Vec<u8>> {
        let record = CommitRecordRef {
            timestamp,
            message,
            files,
            parent,
        };
        serde_json::to_vec(&record).map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Parses the stored bytes of the commit with the given Oid.
    ///
    /// # Errors
    ///
    /// `Error::CommitNotFound` if the bytes are not a commit record. Blobs
    /// share the object namespace, so handing a blob hash to this function
    /// fails the same way a missing object does.
    pub fn parse(oid: Oid, data: &[u8]) -> Result<Self> {
        let record: CommitRecord =
            serde_json::from_slice(data).map_err(|_| Error::CommitNotFound(oid.to_hex()))?;

        Ok(Commit {
            oid,
            timestamp: record.timestamp,
            message: record.message,
            files: record.files,
            parent: record.parent,
        })
    }

    /// Reads and parses the commit stored under `oid`.
    ///
    /// A missing object and an unparseable one both yield
    /// `Error::CommitNotFound`.
    pub fn load(store: &ObjectStore, oid: &Oid) -> Result<Self> {
        let data = store.get(oid).map_err(|e| match e {
            Error::ObjectNotFound(hex) => Error::CommitNotFound(hex),
            other => other,
        })?;
        Self::parse(*oid, &data)
    }

    /// Returns the Oid of this commit.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns the time the commit was created.
    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    /// Returns the full commit message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the first line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Returns the files recorded in this commit, in staging order.
    pub fn files(&self) -> &[IndexEntry] {
        &self.files
    }

    /// Returns the first file recorded under `path`.
    pub fn file(&self, path: &str) -> Option<&IndexEntry> {
        self.files.iter().find(|f| f.path() == path)
    }

    /// Returns the parent commit, if any.
    pub fn parent(&self) -> Option<&Oid> {
        self.parent.as_ref()
    }

    /// Returns true if this is the first commit of the history.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
