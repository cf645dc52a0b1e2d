//! Repository operations.

use std::path::{Component, Path, PathBuf};

use chrono::{SubsecRound, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::diff::{diff_commit, FilePatch};
use crate::error::{Error, Result};
use crate::index::{Index, IndexEntry};
use crate::infra::{create_file_exclusive, read_file, write_file_atomic, LockGuard};
use crate::log::LogIterator;
use crate::objects::oid::OID_HEX_LEN;
use crate::objects::{Blob, Commit, ObjectStore, Oid};
use crate::refs::HeadFile;

/// Name of the repository directory inside the working directory.
pub const REPO_DIR_NAME: &str = ".zerovc";

const OBJECTS_DIR: &str = "objects";
const HEAD_FILE: &str = "HEAD";
const INDEX_FILE: &str = "index";
const CONFIG_FILE: &str = "config";
const LOCK_FILE: &str = "lock";

/// The outcome of [`Repository::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// A new repository was created, or missing parts of one were filled in.
    Created,
    /// The repository already existed; nothing was overwritten.
    AlreadyInitialized,
}

/// A zerovc repository.
///
/// This is the main entry point. It owns the location of the working
/// directory and of the `.zerovc` directory; all state (objects, HEAD and
/// the staging index) lives on disk and is re-read by every operation.
#[derive(Debug, Clone)]
pub struct Repository {
    /// The root directory of the working tree.
    work_dir: PathBuf,
    /// The path to the `.zerovc` directory.
    repo_dir: PathBuf,
}

impl Repository {
    /// Validates that a directory is a usable `.zerovc` directory.
    ///
    /// It must contain an `objects/` directory and the `HEAD` and `index`
    /// files.
    fn validate_repo_dir(repo_dir: &Path) -> Result<()> {
        if !repo_dir.is_dir()
            || !repo_dir.join(OBJECTS_DIR).is_dir()
            || !repo_dir.join(HEAD_FILE).is_file()
            || !repo_dir.join(INDEX_FILE).is_file()
        {
            return Err(Error::NotARepository(repo_dir.to_path_buf()));
        }
        Ok(())
    }

    /// Initializes a repository in the working directory `path`.
    ///
    /// Initialization is idempotent. Missing parts are created, and an
    /// existing `HEAD` or `index` is never overwritten. When both were
    /// already present the status is [`InitStatus::AlreadyInitialized`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zerovc::{InitStatus, Repository};
    ///
    /// let (repo, status) = Repository::init("path/to/project").unwrap();
    /// if status == InitStatus::AlreadyInitialized {
    ///     println!("nothing to do");
    /// }
    /// ```
    pub fn init<P: AsRef<Path>>(path: P) -> Result<(Self, InitStatus)> {
        let path = path.as_ref();
        let work_dir = path
            .canonicalize()
            .map_err(|_| Error::PathNotFound(path.to_path_buf()))?;
        let repo_dir = work_dir.join(REPO_DIR_NAME);

        std::fs::create_dir_all(repo_dir.join(OBJECTS_DIR))?;
        let created_head = create_file_exclusive(repo_dir.join(HEAD_FILE), b"")?;
        let created_index = create_file_exclusive(repo_dir.join(INDEX_FILE), b"[]")?;

        let status = if created_head || created_index {
            info!(path = %repo_dir.display(), "initialized repository");
            InitStatus::Created
        } else {
            warn!(path = %repo_dir.display(), "repository already initialized");
            InitStatus::AlreadyInitialized
        };

        Ok((Repository { work_dir, repo_dir }, status))
    }

    /// Opens an existing repository.
    ///
    /// The path can point to either the working directory (containing
    /// `.zerovc/`) or the `.zerovc` directory itself.
    ///
    /// # Errors
    ///
    /// `Error::NotARepository` if no valid repository is found there.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zerovc::Repository;
    ///
    /// let repo = Repository::open("path/to/project").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        let (work_dir, repo_dir) = if abs_path.ends_with(REPO_DIR_NAME) {
            let work_dir = abs_path
                .parent()
                .ok_or_else(|| Error::NotARepository(path.to_path_buf()))?
                .to_path_buf();
            (work_dir, abs_path)
        } else {
            let repo_dir = abs_path.join(REPO_DIR_NAME);
            (abs_path, repo_dir)
        };

        Self::validate_repo_dir(&repo_dir)?;

        Ok(Repository { work_dir, repo_dir })
    }

    /// Discovers a repository by searching upward from the given path.
    ///
    /// # Errors
    ///
    /// `Error::NotARepository` if the filesystem root is reached without
    /// finding one.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut current = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        loop {
            let repo_dir = current.join(REPO_DIR_NAME);
            if Self::validate_repo_dir(&repo_dir).is_ok() {
                return Ok(Repository {
                    work_dir: current,
                    repo_dir,
                });
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(Error::NotARepository(path.to_path_buf())),
            }
        }
    }

    /// Returns the path to the working directory.
    pub fn path(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the path to the `.zerovc` directory.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn object_store(&self) -> ObjectStore {
        ObjectStore::new(self.repo_dir.join(OBJECTS_DIR))
    }

    fn head_file(&self) -> HeadFile {
        HeadFile::new(self.repo_dir.join(HEAD_FILE))
    }

    fn index_path(&self) -> PathBuf {
        self.repo_dir.join(INDEX_FILE)
    }

    /// Returns the path of the configuration file, which may not exist.
    pub fn config_path(&self) -> PathBuf {
        self.repo_dir.join(CONFIG_FILE)
    }

    /// Loads the repository configuration.
    ///
    /// A missing configuration file yields the defaults.
    pub fn config(&self) -> Result<Config> {
        match Config::from_file(self.config_path()) {
            Err(Error::PathNotFound(_)) => Ok(Config::new()),
            other => other,
        }
    }

    /// Takes the repository lock unless `core.lock` is off.
    fn lock(&self, config: &Config) -> Result<Option<LockGuard>> {
        if config.lock_enabled()? {
            LockGuard::acquire(self.repo_dir.join(LOCK_FILE)).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads the staging index.
    ///
    /// # Errors
    ///
    /// `Error::CorruptIndex` if the index file is missing or cannot be
    /// parsed.
    pub fn index(&self) -> Result<Index> {
        let data = read_file(self.index_path()).map_err(|e| match e {
            Error::PathNotFound(path) => {
                Error::CorruptIndex(format!("{} is missing", path.display()))
            }
            other => other,
        })?;
        let index = Index::parse(&data)?;
        debug!(entries = index.len(), "loaded index");
        Ok(index)
    }

    fn write_index(&self, index: &Index) -> Result<()> {
        write_file_atomic(self.index_path(), &index.to_bytes()?)
    }

    /// Returns the most recent commit, or `None` before the first commit.
    ///
    /// An unreadable or damaged HEAD also reads as `None`.
    pub fn head(&self) -> Option<Oid> {
        self.head_file().read()
    }

    /// Stages a file.
    ///
    /// The file content is stored as a blob first, then an entry for
    /// `path` is appended to the index. With `index.dedup` enabled an
    /// existing entry for the same path is updated in place instead.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file, relative to the working directory.
    ///
    /// # Returns
    ///
    /// The hash of the stored blob.
    ///
    /// # Errors
    ///
    /// - `Error::PathNotFound` if `path` is not a regular file inside the
    ///   working directory.
    /// - `Error::CorruptIndex` if the current index cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zerovc::Repository;
    ///
    /// let repo = Repository::open("path/to/project").unwrap();
    /// let oid = repo.add("src/main.rs").unwrap();
    /// println!("{}", oid);
    /// ```
    pub fn add<P: AsRef<Path>>(&self, path: P) -> Result<Oid> {
        let path = path.as_ref();
        let full_path = self.work_dir.join(path);

        if !full_path.is_file() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        let staged_path = self.staged_path(path)?;

        let config = self.config()?;
        let _lock = self.lock(&config)?;

        let content = read_file(&full_path)?;
        let oid = self.object_store().put(&content)?;

        let entry = IndexEntry::new(staged_path, oid);
        let mut index = self.index()?;
        if config.dedup_index()? {
            index.upsert(entry);
        } else {
            index.append(entry);
        }
        self.write_index(&index)?;

        info!(path = %path.display(), oid = %oid, "staged file");
        Ok(oid)
    }

    /// Returns the index form of `path`, relative to the working directory.
    ///
    /// Absolute paths and paths with `..` components are resolved first and
    /// must lead back inside the working directory.
    fn staged_path(&self, path: &Path) -> Result<String> {
        let needs_resolving =
            path.is_absolute() || path.components().any(|c| c == Component::ParentDir);
        if !needs_resolving {
            return Ok(index_path_string(path));
        }

        let not_found = || Error::PathNotFound(path.to_path_buf());
        let resolved = self
            .work_dir
            .join(path)
            .canonicalize()
            .map_err(|_| not_found())?;
        let relative = resolved.strip_prefix(&self.work_dir).map_err(|_| not_found())?;
        Ok(index_path_string(relative))
    }

    /// Records the staged files as a new commit.
    ///
    /// The new commit's parent is the current head. Once the commit object
    /// is stored, HEAD is moved to it and the index is emptied.
    ///
    /// Committing with nothing staged is allowed and records an empty
    /// snapshot.
    ///
    /// # Returns
    ///
    /// The hash of the new commit.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zerovc::Repository;
    ///
    /// let repo = Repository::open("path/to/project").unwrap();
    /// repo.add("README.md").unwrap();
    /// let oid = repo.create_commit("Add README").unwrap();
    /// ```
    pub fn create_commit(&self, message: &str) -> Result<Oid> {
        let config = self.config()?;
        let _lock = self.lock(&config)?;

        let index = self.index()?;
        let parent = self.head();
        let timestamp = Utc::now().trunc_subsecs(3);

        let data = Commit::format(&timestamp, message, index.entries(), parent.as_ref())?;
        let oid = self.object_store().put(&data)?;

        self.head_file().write(&oid)?;
        self.write_index(&Index::empty())?;

        info!(
            oid = %oid,
            parent = ?parent.map(|p| p.short()),
            files = index.len(),
            "created commit"
        );
        Ok(oid)
    }

    /// Returns an iterator over the history, newest commit first.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zerovc::Repository;
    ///
    /// let repo = Repository::open("path/to/project").unwrap();
    /// for commit in repo.log() {
    ///     let commit = commit.unwrap();
    ///     println!("{} {}", commit.oid().short(), commit.summary());
    /// }
    /// ```
    pub fn log(&self) -> LogIterator {
        LogIterator::new(self.object_store(), self.head())
    }

    /// Resolves a full or abbreviated hash to a stored object.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidOid` if the prefix is shorter than 4 characters,
    ///   is not hex, or matches more than one object.
    /// - `Error::ObjectNotFound` if no object matches.
    pub fn resolve_short_oid(&self, short_oid: &str) -> Result<Oid> {
        if short_oid.len() == OID_HEX_LEN {
            return Oid::from_hex(short_oid);
        }

        let mut matches = self.object_store().find_objects_by_prefix(short_oid)?;

        match matches.len() {
            0 => Err(Error::ObjectNotFound(short_oid.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(Error::InvalidOid(format!(
                "ambiguous short hash: {} ({} matches)",
                short_oid, n
            ))),
        }
    }

    /// Retrieves a commit by its full or abbreviated hash.
    ///
    /// # Errors
    ///
    /// - `Error::CommitNotFound` if `oid_str` is not 4 to 40 hex
    ///   characters, nothing matches, or the object is not a commit record.
    /// - `Error::InvalidOid` if an abbreviated hash is ambiguous.
    pub fn commit(&self, oid_str: &str) -> Result<Commit> {
        let well_formed = (4..=OID_HEX_LEN).contains(&oid_str.len())
            && oid_str.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return Err(Error::CommitNotFound(oid_str.to_string()));
        }

        let oid = self.resolve_short_oid(oid_str).map_err(|e| match e {
            Error::ObjectNotFound(s) => Error::CommitNotFound(s),
            other => other,
        })?;
        Commit::load(&self.object_store(), &oid)
    }

    /// Retrieves a stored file's content.
    pub fn blob(&self, oid: &Oid) -> Result<Blob> {
        let content = self.object_store().get(oid)?;
        Ok(Blob::new(*oid, content))
    }

    /// Compares each file of a commit with the parent commit.
    ///
    /// # Errors
    ///
    /// - `Error::CommitNotFound` if `oid_str` does not name a commit, or
    ///   its parent cannot be loaded.
    /// - `Error::ObjectNotFound` if a referenced blob is missing.
    pub fn show(&self, oid_str: &str) -> Result<Vec<FilePatch>> {
        let commit = self.commit(oid_str)?;
        diff_commit(&self.object_store(), &commit)
    }
}

/// Converts a path to the form stored in the index: `/`-separated, with
/// `.` components removed.
fn index_path_string(path: &Path) -> String {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
