//! The HEAD pointer.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::infra::{read_file, write_file_atomic};
use crate::objects::Oid;

/// The `HEAD` file: the hash of the most recent commit, or empty before
/// the first commit.
#[derive(Debug, Clone)]
pub struct HeadFile {
    path: PathBuf,
}

impl HeadFile {
    /// Creates a handle for the HEAD file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        HeadFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path of the HEAD file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current head commit.
    ///
    /// Returns `None` when the file is empty, missing, unreadable or does
    /// not hold a valid hash. An uninitialized repository and a damaged
    /// HEAD look the same from here.
    pub fn read(&self) -> Option<Oid> {
        let data = match read_file(&self.path) {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read HEAD, treating as no commits");
                return None;
            }
        };

        let text = String::from_utf8_lossy(&data);
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        match Oid::from_hex(text) {
            Ok(oid) => Some(oid),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "HEAD does not hold a hash, treating as no commits");
                None
            }
        }
    }

    /// Points HEAD at `oid`.
    pub fn write(&self, oid: &Oid) -> Result<()> {
        write_file_atomic(&self.path, oid.to_hex().as_bytes())
    }
}
