//! # zerovc
//!
//! A minimal content-addressable version control engine.
//!
//! File contents are stored as blobs keyed by their SHA-1 hash. Staged files
//! accumulate in an index until they are recorded as a commit, and commits
//! form a single linear history reachable from `HEAD`.
//!
//! ## Features
//!
//! - Content-addressed object store (`.zerovc/objects`)
//! - Ordered staging index
//! - Linear commit history with lazy traversal
//! - Line diffs of a commit against its parent
//!
//! ## Quick Start
//!
//! ```no_run
//! use zerovc::{Repository, Result};
//!
//! fn main() -> Result<()> {
//!     let (repo, _status) = Repository::init(".")?;
//!
//!     repo.add("a.txt")?;
//!     let oid = repo.create_commit("first")?;
//!
//!     for commit in repo.log() {
//!         let commit = commit?;
//!         println!("{} {}", commit.oid().short(), commit.summary());
//!     }
//!
//!     for patch in repo.show(&oid.to_hex())? {
//!         println!("{}: {:?}", patch.path(), patch.change());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and Result alias
//! - [`repository`] - Main `Repository` type
//! - [`objects`] - Hashes, blobs, commits and the object store
//! - [`index`] - Staging index
//! - [`refs`] - The HEAD pointer
//! - [`log`] - History traversal
//! - [`diff`] - Commit diffs
//! - [`config`] - Repository configuration

pub mod config;
pub mod diff;
pub mod error;
pub mod index;
pub mod log;
pub mod objects;
pub mod refs;
pub mod repository;

// Internal modules (not part of public API)
pub(crate) mod infra;

pub use config::Config;
pub use error::{Error, Result};
pub use repository::{InitStatus, Repository};

pub use objects::{Blob, Commit, ObjectStore, Oid};

pub use index::{Index, IndexEntry};

pub use log::LogIterator;

pub use diff::{FileChange, FilePatch, Hunk, HunkKind};
