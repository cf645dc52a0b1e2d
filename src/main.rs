//! zerovc command-line interface

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::SecondsFormat;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use zerovc::config::{self, Config};
use zerovc::{FileChange, FilePatch, HunkKind, InitStatus, Repository};

/// Environment variable holding the log filter, e.g. `ZEROVC_LOG=debug`.
const LOG_ENV: &str = "ZEROVC_LOG";

const LOG_SEPARATOR: &str = "-------------------------------------";

/// zerovc - a minimal content-addressable version control tool
#[derive(Parser)]
#[command(name = "zerovc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a repository in the current directory
    Init,
    /// Stage a file for the next commit
    Add {
        /// File to stage
        path: PathBuf,
    },
    /// Record the staged files as a new commit
    Commit {
        /// Commit message
        message: String,
    },
    /// Show the commit history, newest first
    Log {
        /// Show at most this many commits
        #[arg(short = 'n', long = "max-count")]
        max_count: Option<usize>,
    },
    /// Show how each file of a commit differs from the parent commit
    Show {
        /// Commit hash or unique prefix (at least 4 characters)
        commit: String,
    },
    /// Read or write a configuration value
    Config {
        /// Key in section.key form, e.g. index.dedup
        key: String,
        /// New value; prints the current value when omitted
        value: Option<String>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    let cwd = std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .context("Failed to get current directory")?;

    match command {
        Commands::Init => init(&cwd),
        Commands::Add { path } => add(&open(&cwd)?, &cwd, &path),
        Commands::Commit { message } => commit(&open(&cwd)?, &message),
        Commands::Log { max_count } => log(&open(&cwd)?, max_count),
        Commands::Show { commit } => show(&open(&cwd)?, &commit),
        Commands::Config { key, value } => configure(&open(&cwd)?, &key, value.as_deref()),
    }
}

fn open(cwd: &Path) -> Result<Repository> {
    Repository::discover(cwd).context("Not inside a zerovc repository (run `zerovc init` first)")
}

fn init(cwd: &Path) -> Result<()> {
    let (repo, status) = Repository::init(cwd).context("Failed to initialize repository")?;
    match status {
        InitStatus::Created => println!(
            "Initialized empty repository in {}",
            repo.repo_dir().display()
        ),
        InitStatus::AlreadyInitialized => println!("Repository already initialized"),
    }
    Ok(())
}

fn add(repo: &Repository, cwd: &Path, path: &Path) -> Result<()> {
    // Paths are given relative to the current directory, which may be
    // below the working directory.
    let oid = repo
        .add(cwd.join(path))
        .with_context(|| format!("Failed to add {}", path.display()))?;

    println!("{}", oid);
    println!("{} added successfully", path.display());
    Ok(())
}

fn commit(repo: &Repository, message: &str) -> Result<()> {
    let oid = repo
        .create_commit(message)
        .context("Failed to create commit")?;
    println!("Commit {} created successfully", oid);
    Ok(())
}

fn log(repo: &Repository, max_count: Option<usize>) -> Result<()> {
    let limit = max_count.unwrap_or(usize::MAX);
    let mut out = io::stdout().lock();

    for commit in repo.log().take(limit) {
        let commit = commit.context("Failed to read history")?;
        writeln!(out, "{}", LOG_SEPARATOR)?;
        writeln!(out, "Commit: {}", commit.oid().yellow())?;
        writeln!(
            out,
            "Date: {}",
            commit.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true)
        )?;
        writeln!(out, "Message: {}", commit.message())?;
    }

    Ok(())
}

fn show(repo: &Repository, hash: &str) -> Result<()> {
    let patches = repo
        .show(hash)
        .with_context(|| format!("Failed to show commit {}", hash))?;

    let mut out = io::stdout().lock();
    for patch in &patches {
        write_patch(&mut out, patch)?;
    }
    Ok(())
}

fn write_patch(out: &mut impl Write, patch: &FilePatch) -> io::Result<()> {
    writeln!(out, "File : {}", patch.path().bold())?;

    match patch.change() {
        FileChange::InitialCommit => writeln!(out, "This is the first commit"),
        FileChange::NewFile => writeln!(out, "This is a new file in this commit"),
        FileChange::Binary { changed: true } => writeln!(out, "Binary file differs"),
        FileChange::Binary { changed: false } => writeln!(out, "Binary file unchanged"),
        FileChange::Lines(hunks) => {
            writeln!(out)?;
            writeln!(out, "Diff:")?;
            for hunk in hunks {
                for line in hunk.text().split_inclusive('\n') {
                    let line = line.strip_suffix('\n').unwrap_or(line);
                    match hunk.kind() {
                        HunkKind::Added => writeln!(out, "{}", format!("++{}", line).green())?,
                        HunkKind::Removed => writeln!(out, "{}", format!("--{}", line).red())?,
                        HunkKind::Unchanged => writeln!(out, "{}", line.dimmed())?,
                    }
                }
            }
            Ok(())
        }
    }
}

fn configure(repo: &Repository, name: &str, value: Option<&str>) -> Result<()> {
    let (section, key) = config::split_key(name)?;
    let mut cfg: Config = repo.config().context("Failed to read configuration")?;

    match value {
        None => match cfg.get(section, key) {
            Some(current) => println!("{}", current),
            None => bail!("{} is not set", name),
        },
        Some(value) => {
            let typed = (section.to_lowercase(), key.to_lowercase());
            if matches!(
                (typed.0.as_str(), typed.1.as_str()),
                ("index", "dedup") | ("core", "lock")
            ) {
                config::parse_bool(value).with_context(|| format!("{} takes a boolean", name))?;
            }
            cfg.set(section, key, value);
            cfg.write_to(repo.config_path())
                .context("Failed to write configuration")?;
        }
    }

    Ok(())
}
