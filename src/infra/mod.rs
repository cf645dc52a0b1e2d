//! Infrastructure utilities (hashing, filesystem, locking).

pub mod fs;
pub mod hash;
pub mod lock;

pub use fs::{create_file_exclusive, read_file, write_file_atomic};
pub use hash::hash_bytes;
pub use lock::LockGuard;
