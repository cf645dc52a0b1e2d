//! Error types for zerovc.

use std::fmt;
use std::path::PathBuf;

/// The main error type for zerovc operations.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred.
    Io(std::io::Error),

    /// The specified path is not a zerovc repository.
    NotARepository(PathBuf),

    /// The specified path was not found.
    PathNotFound(PathBuf),

    /// The requested object was not found in the object store.
    ObjectNotFound(String),

    /// The hash does not name a readable, well-formed commit record.
    CommitNotFound(String),

    /// The staging index file could not be parsed.
    CorruptIndex(String),

    /// The provided string is not a valid object ID.
    InvalidOid(String),

    /// The configuration file holds a value that cannot be interpreted.
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::NotARepository(path) => {
                write!(f, "not a zerovc repository: {}", path.display())
            }
            Error::PathNotFound(path) => write!(f, "path not found: {}", path.display()),
            Error::ObjectNotFound(oid) => write!(f, "object not found: {}", oid),
            Error::CommitNotFound(oid) => write!(f, "commit not found: {}", oid),
            Error::CorruptIndex(reason) => write!(f, "corrupt index: {}", reason),
            Error::InvalidOid(s) => write!(f, "invalid object id: {}", s),
            Error::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for zerovc operations.
pub type Result<T> = std::result::Result<T, Error>;
