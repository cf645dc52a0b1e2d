//! Commit diffs.
//!
//! This module compares the files of a commit against its parent. Each file
//! of the commit yields one [`FilePatch`], in the commit's staging order.
//! The counterpart of a file in the parent is the *first* parent entry with
//! the same path.

pub mod lines;

use tracing::debug;

use crate::error::Result;
use crate::objects::{Blob, Commit, ObjectStore, Oid};

pub use lines::{diff_lines, Hunk, HunkKind};

/// How a file of a commit relates to the parent commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// The commit has no parent, so nothing was compared.
    InitialCommit,
    /// The parent commit has no entry for this path.
    NewFile,
    /// At least one side is binary; only equality is reported.
    Binary {
        /// Whether the content differs from the parent's.
        changed: bool,
    },
    /// The line-level edit script from the parent's content to this one.
    Lines(Vec<Hunk>),
}

/// The comparison of one file of a commit against the parent commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    path: String,
    oid: Oid,
    parent_oid: Option<Oid>,
    change: FileChange,
}

impl FilePatch {
    /// Returns the path of the file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the blob hash of the file in this commit.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns the blob hash of the file in the parent commit, if it was
    /// present there.
    pub fn parent_oid(&self) -> Option<&Oid> {
        self.parent_oid.as_ref()
    }

    /// Returns the kind of change.
    pub fn change(&self) -> &FileChange {
        &self.change
    }

    /// Returns the line hunks, or an empty slice when no line diff was
    /// computed.
    pub fn hunks(&self) -> &[Hunk] {
        match &self.change {
            FileChange::Lines(hunks) => hunks.as_slice(),
            _ => &[],
        }
    }

    /// Returns true if the file differs from the parent's version.
    ///
    /// Files of the first commit and new files always count as changed.
    pub fn has_changes(&self) -> bool {
        match &self.change {
            FileChange::InitialCommit | FileChange::NewFile => true,
            FileChange::Binary { changed } => *changed,
            FileChange::Lines(hunks) => hunks.iter().any(Hunk::is_change),
        }
    }
}

/// Compares every file of `commit` against the parent commit.
///
/// # Errors
///
/// - `Error::CommitNotFound` if the parent commit cannot be loaded.
/// - `Error::ObjectNotFound` if a blob referenced by either commit is
///   missing.
pub fn diff_commit(store: &ObjectStore, commit: &Commit) -> Result<Vec<FilePatch>> {
    let parent = match commit.parent() {
        Some(oid) => Some(Commit::load(store, oid)?),
        None => None,
    };

    let mut patches = Vec::with_capacity(commit.files().len());

    for entry in commit.files() {
        let blob = Blob::new(*entry.hash(), store.get(entry.hash())?);

        let base = parent.as_ref().and_then(|p| p.file(entry.path()));
        let change = match (&parent, base) {
            (None, _) => FileChange::InitialCommit,
            (Some(_), None) => FileChange::NewFile,
            (Some(_), Some(base)) => {
                let base_blob = Blob::new(*base.hash(), store.get(base.hash())?);
                compare(&base_blob, &blob)
            }
        };

        debug!(path = entry.path(), oid = %entry.hash(), "compared file");
        patches.push(FilePatch {
            path: entry.path().to_string(),
            oid: *entry.hash(),
            parent_oid: base.map(|b| *b.hash()),
            change,
        });
    }

    Ok(patches)
}

fn compare(old: &Blob, new: &Blob) -> FileChange {
    let same = old.oid() == new.oid();

    if old.is_binary() || new.is_binary() {
        return FileChange::Binary { changed: !same };
    }

    if same {
        let text = new.text_lossy();
        let hunks = if text.is_empty() {
            Vec::new()
        } else {
            vec![Hunk::new(HunkKind::Unchanged, text)]
        };
        return FileChange::Lines(hunks);
    }

    FileChange::Lines(diff_lines(&old.text_lossy(), &new.text_lossy()))
}
