//! Integration tests for commit diffs.

use std::fs;
use tempfile::TempDir;
use zerovc::error::Error;
use zerovc::{FileChange, Hunk, HunkKind, Oid, Repository};

struct Fixture {
    temp: TempDir,
    repo: Repository,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let (repo, _) = Repository::init(temp.path()).unwrap();
        Fixture { temp, repo }
    }

    fn stage(&self, path: &str, content: &[u8]) -> Oid {
        fs::write(self.temp.path().join(path), content).unwrap();
        self.repo.add(path).unwrap()
    }

    fn commit(&self, files: &[(&str, &str)], message: &str) -> Oid {
        for (path, content) in files {
            self.stage(path, content.as_bytes());
        }
        self.repo.create_commit(message).unwrap()
    }

    fn object_path(&self, oid: &Oid) -> std::path::PathBuf {
        self.temp
            .path()
            .join(".zerovc")
            .join("objects")
            .join(oid.to_hex())
    }
}

fn kinds_and_text(hunks: &[Hunk]) -> Vec<(HunkKind, &str)> {
    hunks.iter().map(|h| (h.kind(), h.text())).collect()
}

// DF-001: every file of the first commit is reported as first-commit
#[test]
fn test_df001_first_commit() {
    let fx = Fixture::new();
    let c1 = fx.commit(&[("a.txt", "a\n"), ("b.txt", "b\n")], "first");

    let patches = fx.repo.show(&c1.to_hex()).unwrap();

    assert_eq!(patches.len(), 2);
    for patch in &patches {
        assert_eq!(*patch.change(), FileChange::InitialCommit);
        assert!(patch.hunks().is_empty());
    }
}

// DF-002: an unmodified file has no added or removed hunks
#[test]
fn test_df002_unmodified_file() {
    let fx = Fixture::new();
    fx.commit(&[("a.txt", "same\ncontent\n")], "first");
    let c2 = fx.commit(&[("a.txt", "same\ncontent\n")], "second");

    let patches = fx.repo.show(&c2.to_hex()).unwrap();

    assert!(patches[0].hunks().iter().all(|h| h.kind() == HunkKind::Unchanged));
    assert!(!patches[0].has_changes());
    assert_eq!(patches[0].parent_oid(), Some(patches[0].oid()));
}

// DF-003: files absent from the parent are new
#[test]
fn test_df003_new_file_in_later_commit() {
    let fx = Fixture::new();
    fx.commit(&[("a.txt", "a\n")], "first");
    let c2 = fx.commit(&[("a.txt", "a\n"), ("b.txt", "b\n")], "second");

    let patches = fx.repo.show(&c2.to_hex()).unwrap();

    assert_eq!(patches.len(), 2);
    assert_eq!(patches[1].path(), "b.txt");
    assert_eq!(*patches[1].change(), FileChange::NewFile);
    assert!(patches[1].parent_oid().is_none());
}

// DF-004: a replaced line shows as removed then added
#[test]
fn test_df004_modified_line() {
    let fx = Fixture::new();
    fx.commit(&[("a.txt", "one\ntwo\nthree\n")], "first");
    let c2 = fx.commit(&[("a.txt", "one\n2\nthree\n")], "second");

    let patches = fx.repo.show(&c2.to_hex()).unwrap();

    assert_eq!(
        kinds_and_text(patches[0].hunks()),
        [
            (HunkKind::Unchanged, "one\n"),
            (HunkKind::Removed, "two\n"),
            (HunkKind::Added, "2\n"),
            (HunkKind::Unchanged, "three\n"),
        ]
    );
}

// DF-005: deleting every line
#[test]
fn test_df005_emptied_file() {
    let fx = Fixture::new();
    fx.commit(&[("a.txt", "gone\nsoon\n")], "first");
    let c2 = fx.commit(&[("a.txt", "")], "second");

    let patches = fx.repo.show(&c2.to_hex()).unwrap();

    assert_eq!(
        kinds_and_text(patches[0].hunks()),
        [(HunkKind::Removed, "gone\nsoon\n")]
    );
}

// DF-006: the parent side uses the first entry with the same path
#[test]
fn test_df006_duplicate_paths_use_first_match() {
    let fx = Fixture::new();
    fx.stage("a.txt", b"first version\n");
    fx.stage("a.txt", b"second version\n");
    fx.repo.create_commit("both staged").unwrap();

    let c2 = fx.commit(&[("a.txt", "first version\n")], "second");

    let patches = fx.repo.show(&c2.to_hex()).unwrap();
    assert!(!patches[0].has_changes());
}

// DF-007: every file of a commit with duplicates gets its own patch
#[test]
fn test_df007_duplicates_in_current_commit() {
    let fx = Fixture::new();
    fx.commit(&[("a.txt", "base\n")], "first");
    fx.stage("a.txt", b"base\nmore\n");
    fx.stage("a.txt", b"base\n");
    let c2 = fx.repo.create_commit("twice").unwrap();

    let patches = fx.repo.show(&c2.to_hex()).unwrap();

    assert_eq!(patches.len(), 2);
    assert!(patches[0].has_changes());
    assert!(!patches[1].has_changes());
}

// DF-008: binary content is reported without line hunks
#[test]
fn test_df008_binary_file() {
    let fx = Fixture::new();
    fx.stage("data.bin", b"\x89PNG\x00\x01");
    fx.repo.create_commit("first").unwrap();
    fx.stage("data.bin", b"\x89PNG\x00\x02");
    let c2 = fx.repo.create_commit("second").unwrap();

    let patches = fx.repo.show(&c2.to_hex()).unwrap();

    assert_eq!(*patches[0].change(), FileChange::Binary { changed: true });
    assert!(patches[0].hunks().is_empty());
}

// DF-009: deleting a referenced blob surfaces as ObjectNotFound
#[test]
fn test_df009_missing_blob() {
    let fx = Fixture::new();
    fx.commit(&[("a.txt", "hello\n")], "first");
    let c2 = fx.commit(&[("a.txt", "hello\nworld\n")], "second");

    let current = fx.repo.commit(&c2.to_hex()).unwrap();
    fs::remove_file(fx.object_path(current.files()[0].hash())).unwrap();

    assert!(matches!(
        fx.repo.show(&c2.to_hex()),
        Err(Error::ObjectNotFound(_))
    ));
}

// DF-010: show of an unknown hash is CommitNotFound
#[test]
fn test_df010_unknown_commit() {
    let fx = Fixture::new();
    fx.commit(&[("a.txt", "x\n")], "first");

    let missing = "0123456789abcdef0123456789abcdef01234567";
    assert!(matches!(
        fx.repo.show(missing),
        Err(Error::CommitNotFound(_))
    ));
}

// DF-011: show of a blob hash is CommitNotFound
#[test]
fn test_df011_blob_hash_is_not_a_commit() {
    let fx = Fixture::new();
    let blob = fx.stage("a.txt", b"x\n");
    fx.repo.create_commit("first").unwrap();

    assert!(matches!(
        fx.repo.show(&blob.to_hex()),
        Err(Error::CommitNotFound(_))
    ));
}

// DF-012: show accepts an abbreviated hash
#[test]
fn test_df012_show_by_prefix() {
    let fx = Fixture::new();
    let c1 = fx.commit(&[("a.txt", "x\n")], "first");

    let patches = fx.repo.show(&c1.short()).unwrap();
    assert_eq!(patches.len(), 1);
}
