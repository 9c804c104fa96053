//! Shared fixtures for integration tests

use dirsnap::{Value, Variables};
use std::fs;
use std::path::Path;

/// Write `content` at `relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// The `website/` tree used by the end-to-end scenarios
pub fn website_fixture(root: &Path) {
    write_file(root, "website/foo", "${bar}");
    write_file(root, "website/monkey", "ooh-ooh-ooh-eee-eee");
    write_file(root, "website/maths", "${1+2+3}");
}

pub fn vars(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}
