//! Path normalization for snapshot keys

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Compute the snapshot key of `path` relative to `root`
///
/// Components are joined with `/` on every platform and the result is
/// normalized to Unicode NFC, so the same tree yields the same keys whether
/// the filesystem stores composed or decomposed names. Returns `None` when
/// `path` is not below `root` or a component is not valid UTF-8; lossy
/// conversion would let distinct names collide on one key.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut key = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => {
                if !key.is_empty() {
                    key.push('/');
                }
                key.push_str(name.to_str()?);
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(normalize_path_string(&key))
}

/// Resolve symlinks and `..` to an absolute path without UNC prefixes on Windows
pub fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// Normalize a key string: NFC, no trailing slashes
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().collect();
    while result.len() > 1 && (result.ends_with('/') || result.ends_with('\\')) {
        result.pop();
    }
    result
}

/// Final segment of a snapshot key
pub fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
