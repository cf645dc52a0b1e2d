//! Advisory repository locking.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::Result;

/// An exclusive advisory lock on a repository lock file.
///
/// The lock is released when the guard is dropped. The lock file itself is
/// never removed, so every process locks the same inode.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Blocks until an exclusive lock on `path` is acquired.
    ///
    /// The file is created if it does not exist.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()?;
        debug!(path = %path.display(), "acquired repository lock");
        Ok(LockGuard { file, path })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!(path = %self.path.display(), "released repository lock");
    }
}
