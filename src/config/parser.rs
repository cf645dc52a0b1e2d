//! Repository configuration file parser.
//!
//! Parses the git-config style INI format: `[section]` headers,
//! `key = value` lines, and `#` / `;` comments.

use super::Config;
use crate::error::{Error, Result};

/// Parses configuration file content into a `Config` instance.
pub fn parse(content: &str) -> Result<Config> {
    let mut config = Config::new();
    let mut current_section: Option<String> = None;

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            let section = parse_section_header(line).ok_or_else(|| {
                Error::InvalidConfig(format!("line {}: bad section header: {}", number + 1, line))
            })?;
            current_section = Some(section);
            continue;
        }

        let section = current_section.as_deref().ok_or_else(|| {
            Error::InvalidConfig(format!("line {}: key outside of a section", number + 1))
        })?;

        let (key, value) = parse_key_value(line).ok_or_else(|| {
            Error::InvalidConfig(format!("line {}: bad key: {}", number + 1, line))
        })?;
        config.set(section, &key, &value);
    }

    Ok(config)
}

/// Parses a section header like `[core]`.
///
/// Subsections (`[remote "origin"]`) are not supported.
fn parse_section_header(line: &str) -> Option<String> {
    let line = remove_inline_comment(line.trim());
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();

    if inner.is_empty() || !inner.chars().all(is_name_char) {
        return None;
    }

    Some(inner.to_string())
}

/// Parses a key-value line like `key = value` or `key=value`.
///
/// A bare `key` with no `=` means `key = true`, as in git.
fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (key, value) = match line.find('=') {
        Some(eq_pos) => (line[..eq_pos].trim(), parse_value(&line[eq_pos + 1..])),
        None => (remove_inline_comment(line).trim(), "true".to_string()),
    };

    if key.is_empty() || !key.chars().all(is_name_char) {
        return None;
    }

    Some((key.to_string(), value))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Parses a value, handling quotes and escapes.
fn parse_value(s: &str) -> String {
    let s = remove_inline_comment(s.trim());

    if let Some(rest) = s.strip_prefix('"') {
        if let Some(end) = rest.rfind('"') {
            return unescape_value(&rest[..end]);
        }
    }

    unescape_value(s)
}

/// Removes inline comments from a value.
fn remove_inline_comment(s: &str) -> &str {
    let mut in_quotes = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' => escape_next = true,
            '"' => in_quotes = !in_quotes,
            '#' | ';' if !in_quotes => return s[..i].trim_end(),
            _ => {}
        }
    }

    s
}

/// Unescapes a value string.
fn unescape_value(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            _ => {
                result.push(c);
                continue;
            }
        }
        chars.next();
    }

    result
}

/// Formats a value so that [`parse_value`] reads it back unchanged.
pub(super) fn escape_value(value: &str) -> String {
    let needs_quotes = value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(['#', ';']);

    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }

    if needs_quotes {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}
