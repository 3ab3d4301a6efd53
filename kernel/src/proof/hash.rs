//! Content hashes.
//!
//! One function produces every digest: [`canonical_hash`]. Callers pick a
//! [`HashDomain`] and hand over canonical bytes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::hash_domain::HashDomain;

/// Algorithm tag carried by every [`ContentHash`] this crate produces.
pub const HASH_ALGORITHM: &str = "sha256";

/// A digest in `"algorithm:hex"` form, e.g. `"sha256:9f86d0..."`.
///
/// Both halves are non-empty; [`ContentHash::parse`] enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse `"algorithm:hex"`. Returns `None` when either half is empty or
    /// the separator is missing.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon + 1 == s.len() {
            return None;
        }
        Some(Self {
            full: s.to_owned(),
            colon,
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("malformed content hash: {raw:?}")))
    }
}

/// SHA-256 over `domain prefix || data`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    let full = format!("{HASH_ALGORITHM}:{digest}");
    ContentHash {
        colon: HASH_ALGORITHM.len(),
        full,
    }
}
