//! BLAKE3 Verification Tests
//!
//! Checks that content identifiers are built from the official BLAKE3
//! implementation exactly as documented: per-entry name and content digests,
//! all name digests first, then all content digests, hashed once more.

use blake3::Hasher;
use dirsnap::tree::hasher::compute_hash;
use dirsnap::ContentId;

/// Official BLAKE3 hash of empty input
/// Verified: https://github.com/BLAKE3-team/BLAKE3
const EMPTY_HASH: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

#[test]
fn test_compute_hash_is_blake3() {
    assert_eq!(hex::encode(compute_hash(b"")), EMPTY_HASH);

    for input in [&b"a"[..], b"abc", b"Hello, World!"] {
        assert_eq!(compute_hash(input), *blake3::hash(input).as_bytes());
    }
}

/// The identifier of no entries is the hash of no bytes
#[test]
fn test_empty_snapshot_id() {
    let id = ContentId::from_pairs(std::iter::empty::<(&str, &[u8])>());
    assert_eq!(id.to_hex(), EMPTY_HASH);
}

/// Recompute the identifier by hand with the raw hasher
#[test]
fn test_id_layout_names_then_contents() {
    let entries = [
        ("website/foo", "bar"),
        ("website/maths", "6"),
        ("website/monkey", "ooh-ooh-ooh-eee-eee"),
    ];

    let mut hasher = Hasher::new();
    for (name, _) in &entries {
        hasher.update(blake3::hash(name.as_bytes()).as_bytes());
    }
    for (_, content) in &entries {
        hasher.update(blake3::hash(content.as_bytes()).as_bytes());
    }
    let expected = hex::encode(hasher.finalize().as_bytes());

    let id = ContentId::from_pairs(entries.iter().map(|(n, c)| (*n, c.as_bytes())));
    assert_eq!(id.to_hex(), expected);
}

/// Interleaving name and content digests would be a different identifier
#[test]
fn test_id_is_not_interleaved() {
    let entries = [("a", "1"), ("b", "2")];

    let mut hasher = Hasher::new();
    for (name, content) in &entries {
        hasher.update(blake3::hash(name.as_bytes()).as_bytes());
        hasher.update(blake3::hash(content.as_bytes()).as_bytes());
    }
    let interleaved = hex::encode(hasher.finalize().as_bytes());

    let id = ContentId::from_pairs(entries.iter().map(|(n, c)| (*n, c.as_bytes())));
    assert_ne!(id.to_hex(), interleaved);
}

/// Moving bytes between a name and its content changes the identifier
#[test]
fn test_name_content_boundary() {
    let a = ContentId::from_pairs([("ab", &b"c"[..])]);
    let b = ContentId::from_pairs([("a", &b"bc"[..])]);
    assert_ne!(a, b);
}

#[test]
fn test_incremental_hashing_matches_one_shot() {
    let mut hasher = Hasher::new();
    hasher.update(b"Hello, ");
    hasher.update(b"World!");
    assert_eq!(
        hasher.finalize().as_bytes(),
        &compute_hash(b"Hello, World!")
    );
}
