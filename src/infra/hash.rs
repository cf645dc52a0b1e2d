//! SHA-1 content hashing.

use sha1::{Digest, Sha1};

/// SHA-1 hash size in bytes.
pub const SHA1_SIZE: usize = 20;

/// Computes the SHA-1 digest of the given bytes.
///
/// Objects are hashed over their raw content with no type header, so a
/// blob and a commit record with identical bytes share one address.
pub fn hash_bytes(data: &[u8]) -> [u8; SHA1_SIZE] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let mut out = [0u8; SHA1_SIZE];
    out.copy_from_slice(&hasher.finalize());
    out
}
