//! CLI route tests: parsed command lines run against temp trees

use super::test_utils::{website_fixture, write_file};
use clap::Parser;
use dirsnap::cli::{map_error, Cli, RunContext};
use dirsnap::config::DirsnapConfig;
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<String, String> {
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let mut config = DirsnapConfig::default();
    config.logging.color = false;
    let context = RunContext::from_config(config);
    context.execute(&cli.command).map_err(|e| map_error(&e))
}

#[test]
fn test_build_json_rendered() {
    let temp_dir = TempDir::new().unwrap();
    website_fixture(temp_dir.path());
    let root = temp_dir.path().to_string_lossy().to_string();

    let out = run(&["dirsnap", "build", &root, "--var", "bar=bar", "--format", "json"]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["rendered"]["website/foo"], "bar");
    assert_eq!(json["rendered"]["website/monkey"], "ooh-ooh-ooh-eee-eee");
    assert_eq!(json["rendered"]["website/maths"], "6");
    assert_eq!(json["id"].as_str().unwrap().len(), 64);
}

#[test]
fn test_build_json_listing() {
    let temp_dir = TempDir::new().unwrap();
    website_fixture(temp_dir.path());
    let root = temp_dir.path().to_string_lossy().to_string();

    let out = run(&["dirsnap", "build", &root, "--no-render", "--format", "json"]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(
        json["list"],
        serde_json::json!(["website/foo", "website/maths", "website/monkey"])
    );
    assert_eq!(json["map"]["website/maths"], "maths");
    assert!(json.get("rendered").is_none());
}

#[test]
fn test_build_text_output() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "a/b", "${n * 2}");
    let root = temp_dir.path().to_string_lossy().to_string();

    let out = run(&["dirsnap", "build", &root, "--var", "n=21"]).unwrap();
    assert!(out.starts_with("Rendered 1 file\n"));
    assert!(out.contains("--- a/b\n42"));
}

#[test]
fn test_id_command_prints_hex() {
    let temp_dir = TempDir::new().unwrap();
    website_fixture(temp_dir.path());
    let root = temp_dir.path().to_string_lossy().to_string();

    let first = run(&["dirsnap", "id", &root, "--var", "bar=bar"]).unwrap();
    let second = run(&["dirsnap", "id", &root, "--var", "bar=baz"]).unwrap();
    assert_eq!(first.len(), 64);
    assert_ne!(first, second);
}

#[test]
fn test_render_error_names_file() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "pages/index", "${undefined_var}");
    let root = temp_dir.path().to_string_lossy().to_string();

    let err = run(&["dirsnap", "id", &root]).unwrap_err();
    assert!(err.contains("pages/index"), "unexpected message: {err}");
    assert!(err.contains("undefined_var"), "unexpected message: {err}");
}

#[test]
fn test_bad_pattern_and_lenient_flag() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "a", "x");
    let root = temp_dir.path().to_string_lossy().to_string();

    assert!(run(&["dirsnap", "id", &root, "--exclude", "[z-a]"]).is_err());
    assert!(run(&["dirsnap", "id", &root, "--exclude", "[z-a]", "--lenient-exclude"]).is_ok());
}

#[test]
fn test_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("absent").to_string_lossy().to_string();
    assert!(run(&["dirsnap", "id", &root]).is_err());
}
