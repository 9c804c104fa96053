//! Integration tests for configuration files driving snapshot builds

use super::test_utils::{website_fixture, write_file};
use dirsnap::cli::{Commands, RunContext, SourceArgs};
use dirsnap::config::ConfigLoader;
use dirsnap::SnapshotOutput;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("dirsnap.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_config_file_drives_build() {
    let temp_dir = TempDir::new().unwrap();
    website_fixture(temp_dir.path());
    write_file(temp_dir.path(), "website/draft.tmp", "${missing}");

    let config_path = write_config(
        &temp_dir,
        &format!(
            r#"
[source]
source_dir = '{}'
exclude = '\.tmp$'

[source.vars]
bar = "bar"
"#,
            temp_dir.path().join("website").display()
        ),
    );

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    let snapshot = config.snapshot_builder().unwrap().build().unwrap();

    assert_eq!(snapshot.get("foo"), Some("bar"));
    assert_eq!(snapshot.get("maths"), Some("6"));
    assert!(snapshot.get("draft.tmp").is_none());
}

#[test]
fn test_cli_arguments_override_config_file() {
    let temp_dir = TempDir::new().unwrap();
    website_fixture(temp_dir.path());
    let config_path = write_config(
        &temp_dir,
        r#"
[source]
source_dir = "does-not-exist"
render = true

[source.vars]
bar = "from file"
"#,
    );

    let context = RunContext::new(Some(config_path)).unwrap();
    let out = context
        .execute(&Commands::Build {
            source: SourceArgs {
                source_dir: Some(temp_dir.path().join("website")),
                vars: vec![("bar".to_string(), "from cli".to_string())],
                ..SourceArgs::default()
            },
            format: "json".to_string(),
        })
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["rendered"]["foo"], "from cli");
}

#[test]
fn test_non_primitive_vars_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        &format!(
            r#"
[source]
source_dir = '{}'

[source.vars]
items = [1, 2]
"#,
            temp_dir.path().display()
        ),
    );

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    let err = config.snapshot_builder().unwrap_err();
    assert!(err.to_string().contains("items (list)"), "got: {err}");
}

#[test]
fn test_listing_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    website_fixture(temp_dir.path());
    let config_path = write_config(
        &config_dir,
        &format!(
            r#"
[source]
source_dir = '{}'
render = false

[build]
workers = 1
"#,
            temp_dir.path().display()
        ),
    );

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    let output = config.snapshot_builder().unwrap().build().unwrap().into_output();
    match output {
        SnapshotOutput::Listing { list, .. } => {
            assert_eq!(list, vec!["website/foo", "website/maths", "website/monkey"]);
        }
        other => panic!("expected listing, got {other:?}"),
    }
}
