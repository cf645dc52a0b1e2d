//! Commit history traversal.
//!
//! History is a singly-linked list of commits. [`LogIterator`] walks it from
//! a starting commit back to the root, newest first.
//!
//! ```no_run
//! use zerovc::Repository;
//!
//! let repo = Repository::open(".").unwrap();
//! for commit in repo.log().take(10) {
//!     let commit = commit.unwrap();
//!     println!("{} {}", commit.oid().short(), commit.summary());
//! }
//! ```

use tracing::trace;

use crate::error::Result;
use crate::objects::{Commit, ObjectStore, Oid};

/// An iterator over commits, following parent links.
///
/// The walk is lazy: each commit is read when it is yielded. A missing or
/// unparseable commit anywhere in the chain yields one
/// `Err(Error::CommitNotFound)` and ends the iteration, so a broken history
/// is reported rather than silently shortened.
#[derive(Debug)]
pub struct LogIterator {
    store: ObjectStore,
    next: Option<Oid>,
}

impl LogIterator {
    /// Creates an iterator starting at `start`.
    ///
    /// `None` means there are no commits; the iterator is then empty.
    pub fn new(store: ObjectStore, start: Option<Oid>) -> Self {
        LogIterator { store, next: start }
    }
}

impl Iterator for LogIterator {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;
        trace!(oid = %oid, "reading commit");

        match Commit::load(&self.store, &oid) {
            Ok(commit) => {
                self.next = commit.parent().copied();
                Some(Ok(commit))
            }
            // `next` stays empty, so the error ends the walk.
            Err(e) => Some(Err(e)),
        }
    }
}
