//! Integration tests for Repository module.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use zerovc::error::Error;
use zerovc::{FileChange, HunkKind, InitStatus, Repository};

fn init_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().unwrap();
    let (repo, _) = Repository::init(temp.path()).unwrap();
    (temp, repo)
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

// RP-001: init creates objects, HEAD and index
#[test]
fn test_rp001_init_creates_layout() {
    let temp = TempDir::new().unwrap();
    let (repo, status) = Repository::init(temp.path()).unwrap();

    assert_eq!(status, InitStatus::Created);
    let repo_dir = temp.path().join(".zerovc");
    assert!(repo_dir.join("objects").is_dir());
    assert!(repo_dir.join("HEAD").is_file());
    assert!(repo_dir.join("index").is_file());
    assert!(repo.head().is_none());
    assert!(repo.index().unwrap().is_empty());
}

// RP-002: init on an existing repository never overwrites HEAD or index
#[test]
fn test_rp002_init_is_idempotent() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    repo.add("a.txt").unwrap();
    let head = repo.create_commit("first").unwrap();
    write(temp.path(), "b.txt", "b\n");
    repo.add("b.txt").unwrap();

    let (repo, status) = Repository::init(temp.path()).unwrap();

    assert_eq!(status, InitStatus::AlreadyInitialized);
    assert_eq!(repo.head(), Some(head));
    assert_eq!(repo.index().unwrap().len(), 1);
}

// RP-003: open of a plain directory is NotARepository
#[test]
fn test_rp003_open_invalid_path() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        Repository::open(temp.path()),
        Err(Error::NotARepository(_))
    ));
    assert!(matches!(
        Repository::open("/nonexistent/zerovc/path"),
        Err(Error::NotARepository(_))
    ));
}

// RP-004: open of a repository missing its index is NotARepository
#[test]
fn test_rp004_open_incomplete_repository() {
    let (temp, _repo) = init_repo();
    fs::remove_file(temp.path().join(".zerovc").join("index")).unwrap();

    assert!(matches!(
        Repository::open(temp.path()),
        Err(Error::NotARepository(_))
    ));
}

// RP-005: add is content addressed
#[test]
fn test_rp005_add_hash_is_deterministic() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    write(temp.path(), "copy.txt", "hello\n");

    let first = repo.add("a.txt").unwrap();
    let second = repo.add("copy.txt").unwrap();

    assert_eq!(first.to_hex(), "f572d396fae9206628714fb2ce00f72e94f2258f");
    assert_eq!(first, second);

    let objects: Vec<_> = fs::read_dir(temp.path().join(".zerovc").join("objects"))
        .unwrap()
        .collect();
    assert_eq!(objects.len(), 1);
}

// RP-006: two adds produce two entries in order
#[test]
fn test_rp006_staging_accumulates_in_order() {
    let (temp, repo) = init_repo();
    write(temp.path(), "b.txt", "b\n");
    write(temp.path(), "a.txt", "a\n");

    repo.add("b.txt").unwrap();
    repo.add("a.txt").unwrap();

    let index = repo.index().unwrap();
    let paths: Vec<&str> = index.entries().iter().map(|e| e.path()).collect();
    assert_eq!(paths, ["b.txt", "a.txt"]);
}

// RP-007: staging the same path twice keeps both entries by default
#[test]
fn test_rp007_duplicate_paths_are_kept() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "one\n");
    let first = repo.add("a.txt").unwrap();
    write(temp.path(), "a.txt", "two\n");
    let second = repo.add("a.txt").unwrap();

    let index = repo.index().unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.entries()[0].hash(), &first);
    assert_eq!(index.entries()[1].hash(), &second);
}

// RP-008: the index file holds a JSON array of path/hash pairs
#[test]
fn test_rp008_index_file_format() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    repo.add("a.txt").unwrap();

    let text = fs::read_to_string(temp.path().join(".zerovc").join("index")).unwrap();
    assert_eq!(
        text,
        r#"[{"path":"a.txt","hash":"f572d396fae9206628714fb2ce00f72e94f2258f"}]"#
    );
}

// RP-009: add of a missing file leaves the index alone
#[test]
fn test_rp009_add_missing_file() {
    let (_temp, repo) = init_repo();

    let result = repo.add("missing.txt");

    assert!(matches!(result, Err(Error::PathNotFound(_))));
    assert!(repo.index().unwrap().is_empty());
}

// RP-010: commit snapshots the index, moves HEAD and clears the index
#[test]
fn test_rp010_commit_sequence() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    let blob = repo.add("a.txt").unwrap();

    let oid = repo.create_commit("first").unwrap();

    assert_eq!(repo.head(), Some(oid));
    assert!(repo.index().unwrap().is_empty());

    let head_text = fs::read_to_string(temp.path().join(".zerovc").join("HEAD")).unwrap();
    assert_eq!(head_text, oid.to_hex());

    let commit = repo.commit(&oid.to_hex()).unwrap();
    assert_eq!(commit.message(), "first");
    assert!(commit.parent().is_none());
    assert_eq!(commit.files().len(), 1);
    assert_eq!(commit.files()[0].path(), "a.txt");
    assert_eq!(commit.files()[0].hash(), &blob);
}

// RP-011: the commit hash is the hash of the stored record
#[test]
fn test_rp011_commit_object_is_content_addressed() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    repo.add("a.txt").unwrap();
    let oid = repo.create_commit("first").unwrap();

    let path = temp.path().join(".zerovc").join("objects").join(oid.to_hex());
    let stored = fs::read_to_string(path).unwrap();

    assert!(stored.starts_with(r#"{"timeStamp":""#));
    assert!(stored.contains(r#""message":"first""#));
    assert!(stored.ends_with(r#""parent":null}"#));

    let store = zerovc::ObjectStore::new(temp.path().join(".zerovc").join("objects"));
    assert_eq!(store.put(stored.as_bytes()).unwrap(), oid);
}

// RP-012: second commit points at the first
#[test]
fn test_rp012_commit_chaining() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    repo.add("a.txt").unwrap();
    let c1 = repo.create_commit("first").unwrap();

    write(temp.path(), "a.txt", "hello\nworld\n");
    repo.add("a.txt").unwrap();
    let c2 = repo.create_commit("second").unwrap();

    assert_ne!(c1, c2);
    assert_eq!(repo.commit(&c2.to_hex()).unwrap().parent(), Some(&c1));
}

// RP-013: the two-commit scenario end to end
#[test]
fn test_rp013_hello_world_scenario() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    repo.add("a.txt").unwrap();
    let c1 = repo.create_commit("first").unwrap();

    write(temp.path(), "a.txt", "hello\nworld\n");
    repo.add("a.txt").unwrap();
    let c2 = repo.create_commit("second").unwrap();

    let history: Vec<_> = repo.log().map(|c| c.unwrap()).collect();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].oid(), &c2);
    assert_eq!(history[0].message(), "second");
    assert_eq!(history[1].oid(), &c1);
    assert!(history[1].parent().is_none());

    let patches = repo.show(&c2.to_hex()).unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].path(), "a.txt");

    let hunks: Vec<_> = patches[0]
        .hunks()
        .iter()
        .map(|h| (h.kind(), h.text()))
        .collect();
    assert_eq!(
        hunks,
        [(HunkKind::Unchanged, "hello\n"), (HunkKind::Added, "world\n")]
    );

    let first = repo.show(&c1.to_hex()).unwrap();
    assert_eq!(*first[0].change(), FileChange::InitialCommit);
}

// RP-014: an empty index still produces a commit
#[test]
fn test_rp014_empty_commit() {
    let (_temp, repo) = init_repo();
    let oid = repo.create_commit("empty").unwrap();

    assert_eq!(repo.head(), Some(oid));
    assert!(repo.commit(&oid.to_hex()).unwrap().files().is_empty());
}

// RP-015: abbreviated hashes resolve; malformed or unknown ones do not
#[test]
fn test_rp015_commit_by_prefix() {
    let (_temp, repo) = init_repo();
    let oid = repo.create_commit("only").unwrap();

    assert_eq!(repo.commit(&oid.to_hex()[..6]).unwrap().oid(), &oid);
    assert!(matches!(repo.commit("ab"), Err(Error::CommitNotFound(_))));
    assert!(matches!(repo.commit("zzzz"), Err(Error::CommitNotFound(_))));
    assert!(matches!(
        repo.show(&"z".repeat(40)),
        Err(Error::CommitNotFound(_))
    ));

    let unknown = if oid.to_hex().starts_with("0000") { "ffff" } else { "0000" };
    assert!(matches!(
        repo.commit(unknown),
        Err(Error::CommitNotFound(_))
    ));
}

// RP-016: a damaged HEAD reads as "no commits"
#[test]
fn test_rp016_damaged_head_is_no_head() {
    let (temp, repo) = init_repo();
    fs::write(temp.path().join(".zerovc").join("HEAD"), "not a hash").unwrap();

    assert!(repo.head().is_none());
    assert_eq!(repo.log().count(), 0);

    let oid = repo.create_commit("fresh start").unwrap();
    assert!(repo.commit(&oid.to_hex()).unwrap().parent().is_none());
}

// RP-017: a corrupt index is reported, not replaced
#[test]
fn test_rp017_corrupt_index() {
    let (temp, repo) = init_repo();
    let index_path = temp.path().join(".zerovc").join("index");
    fs::write(&index_path, "[{\"path\":\"a.txt\"").unwrap();

    assert!(matches!(repo.index(), Err(Error::CorruptIndex(_))));
    assert!(matches!(
        repo.create_commit("m"),
        Err(Error::CorruptIndex(_))
    ));
    assert_eq!(fs::read_to_string(&index_path).unwrap(), "[{\"path\":\"a.txt\"");
}

// RP-018: discover finds the repository from a subdirectory
#[test]
fn test_rp018_discover_from_subdir() {
    let (temp, repo) = init_repo();
    let sub = temp.path().join("src");
    fs::create_dir(&sub).unwrap();

    let found = Repository::discover(&sub).unwrap();
    assert_eq!(found.path(), repo.path());

    let outside = TempDir::new().unwrap();
    assert!(matches!(
        Repository::discover(outside.path()),
        Err(Error::NotARepository(_))
    ));
}

// RP-019: files in subdirectories are staged with '/' paths
#[test]
fn test_rp019_add_nested_file() {
    let (temp, repo) = init_repo();
    fs::create_dir_all(temp.path().join("src").join("bin")).unwrap();
    write(&temp.path().join("src").join("bin"), "main.rs", "fn main() {}\n");

    repo.add(Path::new("src").join("bin").join("main.rs")).unwrap();

    assert_eq!(repo.index().unwrap().entries()[0].path(), "src/bin/main.rs");
}

// RP-020: blob returns stored content
#[test]
fn test_rp020_blob_lookup() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello\n");
    let oid = repo.add("a.txt").unwrap();

    let blob = repo.blob(&oid).unwrap();
    assert_eq!(blob.content_str(), Some("hello\n"));
    assert!(!blob.is_binary());

    let missing = zerovc::Oid::from_hex("0123456789abcdef0123456789abcdef01234567").unwrap();
    assert!(matches!(repo.blob(&missing), Err(Error::ObjectNotFound(_))));
}

// RP-021: absolute and `..` paths are stored relative to the working directory
#[test]
fn test_rp021_add_normalizes_paths() {
    let (temp, repo) = init_repo();
    fs::create_dir_all(temp.path().join("docs")).unwrap();
    write(temp.path(), "a.txt", "a\n");
    write(&temp.path().join("docs"), "b.txt", "b\n");

    repo.add(temp.path().join("a.txt")).unwrap();
    let dotted = Path::new("docs").join("..").join("docs").join("b.txt");
    repo.add(dotted).unwrap();

    let index = repo.index().unwrap();
    let paths: Vec<&str> = index.entries().iter().map(|e| e.path()).collect();
    assert_eq!(paths, ["a.txt", "docs/b.txt"]);
}

// RP-022: files outside the working directory are rejected
#[test]
fn test_rp022_add_outside_work_dir() {
    let outside = TempDir::new().unwrap();
    write(outside.path(), "secret.txt", "x\n");
    let (_temp, repo) = init_repo();

    assert!(matches!(
        repo.add(outside.path().join("secret.txt")),
        Err(Error::PathNotFound(_))
    ));
    assert!(repo.index().unwrap().is_empty());
}
