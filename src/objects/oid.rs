//! Object ID (content hash) representation.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::infra::hash::SHA1_SIZE;

/// The length of an object ID in bytes.
pub const OID_BYTES: usize = SHA1_SIZE;

/// The length of an object ID as a hexadecimal string.
pub const OID_HEX_LEN: usize = OID_BYTES * 2;

/// An object ID: the SHA-1 hash of an object's bytes.
///
/// Blobs and commit records share one address space, so an `Oid` alone does
/// not say which kind of object it names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    bytes: [u8; OID_BYTES],
}

impl Oid {
    /// Creates an Oid from a 40-character hexadecimal string.
    ///
    /// Upper and lower case digits are both accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerovc::objects::Oid;
    ///
    /// let oid = Oid::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
    /// assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    /// ```
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != OID_HEX_LEN {
            return Err(Error::InvalidOid(s.to_string()));
        }

        let mut bytes = [0u8; OID_BYTES];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidOid(s.to_string()))?;

        Ok(Oid { bytes })
    }

    /// Creates an Oid from a raw 20-byte digest.
    pub fn from_bytes(bytes: [u8; OID_BYTES]) -> Self {
        Oid { bytes }
    }

    /// Returns the lowercase, 40-character hexadecimal form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns the first 7 hexadecimal characters, for display.
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// Returns a reference to the raw bytes.
    pub fn as_bytes(&self) -> &[u8; OID_BYTES] {
        &self.bytes
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.short())
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Oid::from_hex(s)
    }
}

impl Serialize for Oid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Oid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Oid::from_hex(&s).map_err(de::Error::custom)
    }
}
