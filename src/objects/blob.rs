//! Blob objects: stored file content.

use std::borrow::Cow;

use super::oid::Oid;

/// Number of leading bytes inspected by [`Blob::is_binary`].
const BINARY_SNIFF_LEN: usize = 8000;

/// The content of a file at the moment it was staged.
///
/// Blobs carry no metadata; the path a blob was staged under lives in the
/// index entry or commit record that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    oid: Oid,
    content: Vec<u8>,
}

impl Blob {
    /// Wraps bytes read from the object store under `oid`.
    pub fn new(oid: Oid, content: Vec<u8>) -> Self {
        Blob { oid, content }
    }

    /// Returns the hash this blob is stored under.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns the raw content of the blob.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content as UTF-8, or `None` if it is not valid UTF-8.
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Returns the content as text, replacing invalid UTF-8 sequences.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Returns the size of the blob content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the content appears to be binary.
    ///
    /// Content is treated as binary if a NUL byte occurs within the first
    /// 8000 bytes, the same heuristic git uses.
    pub fn is_binary(&self) -> bool {
        let check_len = self.content.len().min(BINARY_SNIFF_LEN);
        self.content[..check_len].contains(&0)
    }
}
