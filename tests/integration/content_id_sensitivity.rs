//! Integration tests for content identifier determinism and sensitivity

use super::test_utils::{vars, write_file};
use dirsnap::{build, ContentId};
use std::fs;
use tempfile::TempDir;

fn id_of(temp_dir: &TempDir) -> ContentId {
    build(temp_dir.path(), "", &vars(&[("who", "world")]), true)
        .unwrap()
        .content_id()
}

fn populated() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "file1.txt", "content1");
    write_file(temp_dir.path(), "file2.txt", "hello ${who}");
    write_file(temp_dir.path(), "dir1/file3.txt", "content3");
    temp_dir
}

/// The same tree always produces the same identifier
#[test]
fn test_same_tree_same_id() {
    let temp_dir = populated();
    assert_eq!(id_of(&temp_dir), id_of(&temp_dir));
}

/// Trees built in a different order on disk agree
#[test]
fn test_creation_order_does_not_matter() {
    let first = populated();

    let second = TempDir::new().unwrap();
    write_file(second.path(), "dir1/file3.txt", "content3");
    write_file(second.path(), "file2.txt", "hello ${who}");
    write_file(second.path(), "file1.txt", "content1");

    assert_eq!(id_of(&first), id_of(&second));
}

#[test]
fn test_content_change_changes_id() {
    let temp_dir = populated();
    let before = id_of(&temp_dir);
    write_file(temp_dir.path(), "dir1/file3.txt", "content3!");
    assert_ne!(before, id_of(&temp_dir));
}

#[test]
fn test_file_addition_changes_id() {
    let temp_dir = populated();
    let before = id_of(&temp_dir);
    write_file(temp_dir.path(), "file4.txt", "");
    assert_ne!(before, id_of(&temp_dir));
}

#[test]
fn test_file_removal_changes_id() {
    let temp_dir = populated();
    let before = id_of(&temp_dir);
    fs::remove_file(temp_dir.path().join("file1.txt")).unwrap();
    assert_ne!(before, id_of(&temp_dir));
}

#[test]
fn test_rename_changes_id() {
    let temp_dir = populated();
    let before = id_of(&temp_dir);
    fs::rename(
        temp_dir.path().join("file1.txt"),
        temp_dir.path().join("renamed.txt"),
    )
    .unwrap();
    assert_ne!(before, id_of(&temp_dir));
}

/// Only the rendered output counts: different sources that render the same agree
#[test]
fn test_id_covers_rendered_content() {
    let templated = TempDir::new().unwrap();
    write_file(templated.path(), "greeting", "hello ${who}");

    let literal = TempDir::new().unwrap();
    write_file(literal.path(), "greeting", "hello world");

    assert_eq!(id_of(&templated), id_of(&literal));
}

/// A variable change alters rendered output and therefore the identifier
#[test]
fn test_variable_change_changes_id() {
    let temp_dir = populated();
    let world = build(temp_dir.path(), "", &vars(&[("who", "world")]), true).unwrap();
    let moon = build(temp_dir.path(), "", &vars(&[("who", "moon")]), true).unwrap();
    assert_ne!(world.content_id(), moon.content_id());
}

fn listing_id(temp_dir: &TempDir) -> ContentId {
    build(temp_dir.path(), "", &vars(&[]), false)
        .unwrap()
        .content_id()
}

/// Listing never reads files: only the set of names counts
#[test]
fn test_listing_id_tracks_names_only() {
    let temp_dir = populated();
    let before = listing_id(&temp_dir);

    write_file(temp_dir.path(), "file1.txt", "changed");
    assert_eq!(before, listing_id(&temp_dir));

    write_file(temp_dir.path(), "file5.txt", "");
    assert_ne!(before, listing_id(&temp_dir));
}

#[test]
fn test_listing_and_rendering_ids_differ() {
    let temp_dir = populated();
    let rendered = id_of(&temp_dir);
    let listed = build(temp_dir.path(), "", &vars(&[("who", "world")]), false)
        .unwrap()
        .content_id();
    assert_ne!(rendered, listed);
}

#[test]
fn test_id_is_hex_encoded() {
    let id = id_of(&populated()).to_string();
    assert_eq!(id.len(), 64);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}
