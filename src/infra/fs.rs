//! Filesystem utilities for reading and writing repository files.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads the entire contents of a file as bytes.
///
/// A missing file is reported as `Error::PathNotFound` so callers can map
/// it onto their own "not found" kind.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound(path.as_ref().to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

/// Writes data to a file atomically.
///
/// The data goes to a temporary sibling file first, which is then renamed
/// over the target. Readers see either the old content or the new content,
/// never a partial write.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = {
        let mut temp = path.to_path_buf();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "temp".to_string());
        temp.set_file_name(format!(".{}.tmp", file_name));
        temp
    };

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Creates a file with the given content only if it does not exist yet.
///
/// Returns `true` if the file was created, `false` if it was already there
/// (in which case its content is left untouched).
pub fn create_file_exclusive<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<bool> {
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path.as_ref())
    {
        Ok(mut file) => {
            file.write_all(data)?;
            file.sync_all()?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(Error::Io(e)),
    }
}
