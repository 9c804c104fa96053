//! Content identifiers for snapshots using BLAKE3
//!
//! ContentId = H(H(name_1) || .. || H(name_n) || H(content_1) || .. || H(content_n))
//!
//! Entries are enumerated in relative-path order. Names and contents are
//! digested into two separate fixed-width halves, so a content string that
//! embeds another file's name cannot shift bytes across entry boundaries.

use blake3::Hasher;
use serde::{Serialize, Serializer};
use std::fmt;

/// 32-byte BLAKE3 digest
pub type Hash = [u8; 32];

/// Deterministic identifier of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentId(Hash);

impl ContentId {
    /// Compute the identifier over `(relative path, content)` pairs
    ///
    /// The input order does not matter: pairs are sorted by path first.
    pub fn from_pairs<'a, I, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, C)>,
        C: AsRef<[u8]>,
    {
        let mut digests: Vec<(&str, Hash, Hash)> = pairs
            .into_iter()
            .map(|(name, content)| {
                (
                    name,
                    compute_hash(name.as_bytes()),
                    compute_hash(content.as_ref()),
                )
            })
            .collect();
        digests.sort_by(|a, b| a.0.cmp(b.0));
        Self::from_sorted_digests(digests.iter().map(|(_, name, content)| (name, content)))
    }

    /// Combine per-entry digests that are already in path order
    pub fn from_sorted_digests<'h, I>(digests: I) -> Self
    where
        I: IntoIterator<Item = (&'h Hash, &'h Hash)>,
    {
        let mut names = Vec::new();
        let mut contents = Vec::new();
        for (name, content) in digests {
            names.extend_from_slice(name);
            contents.extend_from_slice(content);
        }

        let mut hasher = Hasher::new();
        hasher.update(&names);
        hasher.update(&contents);
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Compute a hash of arbitrary data
pub fn compute_hash(data: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(data);
    *hasher.finalize().as_bytes()
}
