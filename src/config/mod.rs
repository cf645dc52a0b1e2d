//! Repository configuration.
//!
//! Settings live in the optional `.zerovc/config` file, written in the
//! git-config INI style:
//!
//! ```text
//! [core]
//!     lock = true
//! [index]
//!     dedup = false
//! ```
//!
//! # Example
//!
//! ```no_run
//! use zerovc::config::Config;
//!
//! let config = Config::from_file(".zerovc/config").unwrap();
//! if config.dedup_index().unwrap() {
//!     println!("staging replaces entries with the same path");
//! }
//! ```

mod parser;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::infra::{read_file, write_file_atomic};

/// A parsed repository configuration.
///
/// Section and key names are case-insensitive and stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// section -> key -> value
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Config {
            entries: BTreeMap::new(),
        }
    }

    /// Parses configuration from a file.
    ///
    /// # Errors
    ///
    /// `Error::PathNotFound` if the file does not exist, and
    /// `Error::InvalidConfig` if it is not UTF-8 or cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = read_file(path.as_ref())?;
        let text = String::from_utf8(content).map_err(|_| {
            Error::InvalidConfig(format!("{} is not valid UTF-8", path.as_ref().display()))
        })?;
        Self::from_str(&text)
    }

    /// Parses configuration from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        parser::parse(content)
    }

    /// Gets a configuration value.
    ///
    /// # Arguments
    ///
    /// * `section` - The section name (e.g., "core", "index").
    /// * `key` - The key name (e.g., "lock", "dedup").
    ///
    /// # Returns
    ///
    /// The value if found, or `None` if the key doesn't exist.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries
            .get(&section.to_lowercase())
            .and_then(|keys| keys.get(&key.to_lowercase()))
            .map(|s| s.as_str())
    }

    /// Gets a configuration value as a boolean.
    ///
    /// Accepted spellings:
    /// - `true`, `yes`, `on`, `1` -> `true`
    /// - `false`, `no`, `off`, `0` -> `false`
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the key doesn't exist, `Err(Error::InvalidConfig)` if
    /// the value is not a boolean.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get(section, key) {
            None => Ok(None),
            Some(value) => parse_bool(value)
                .map(Some)
                .map_err(|_| {
                    Error::InvalidConfig(format!(
                        "{}.{}: invalid boolean value: {}",
                        section, key, value
                    ))
                }),
        }
    }

    /// Sets a configuration value, replacing any previous one.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.entries
            .entry(section.to_lowercase())
            .or_default()
            .insert(key.to_lowercase(), value.to_string());
    }

    /// Writes the configuration to `path`, replacing the file atomically.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_file_atomic(path, self.to_string().as_bytes())
    }

    /// `index.dedup`: whether staging a path that is already staged
    /// replaces its entry instead of appending another one. Defaults to
    /// `false`.
    pub fn dedup_index(&self) -> Result<bool> {
        Ok(self.get_bool("index", "dedup")?.unwrap_or(false))
    }

    /// `core.lock`: whether mutating commands take the repository lock.
    /// Defaults to `true`.
    pub fn lock_enabled(&self) -> Result<bool> {
        Ok(self.get_bool("core", "lock")?.unwrap_or(true))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (section, keys) in &self.entries {
            if keys.is_empty() {
                continue;
            }
            writeln!(f, "[{}]", section)?;
            for (key, value) in keys {
                writeln!(f, "\t{} = {}", key, parser::escape_value(value))?;
            }
        }
        Ok(())
    }
}

/// Splits a dotted name like `index.dedup` into section and key.
///
/// # Errors
///
/// `Error::InvalidConfig` if the name is not of the form `section.key`.
pub fn split_key(name: &str) -> Result<(&str, &str)> {
    match name.split_once('.') {
        Some((section, key)) if !section.is_empty() && !key.is_empty() && !key.contains('.') => {
            Ok((section, key))
        }
        _ => Err(Error::InvalidConfig(format!(
            "key does not look like section.key: {}",
            name
        ))),
    }
}

/// Parses a string as a boolean value.
pub fn parse_bool(value: &str) -> Result<bool> {
    let lower = value.trim().to_lowercase();
    match lower.as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "invalid boolean value: {}",
            value
        ))),
    }
}
