//! Tests for configuration loading and root folder resolution
//!
//! Tests that manipulate MBTI_ROOT_FOLDER are marked with #[serial] so they
//! run sequentially, not in parallel.

use mbti_common::config::{database_path, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(Some(Path::new("/tmp/from-cli")), Some(&toml));
    assert_eq!(root, PathBuf::from("/tmp/from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, Some(&toml));
    assert_eq!(root, PathBuf::from("/tmp/from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_no_cli_or_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, Some(&toml));
    assert_eq!(root, PathBuf::from("/tmp/from-toml"));
}

#[test]
#[serial]
fn test_default_root_folder_when_nothing_configured() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = resolve_root_folder(None, None);
    assert!(!root.as_os_str().is_empty());
    assert!(root.to_string_lossy().contains("mbti"));
}

#[test]
fn test_database_path_inside_root() {
    let path = database_path(Path::new("/srv/quiz"));
    assert_eq!(path, PathBuf::from("/srv/quiz/mbti.db"));
}

#[test]
fn test_toml_parse_all_fields() {
    let config = TomlConfig::parse(
        r#"
        root_folder = "/srv/quiz"
        host = "0.0.0.0"
        port = 8080
        log_level = "debug"
        token_secret = "s3cret"
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/quiz")));
    assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(config.token_secret.as_deref(), Some("s3cret"));
}

#[test]
fn test_toml_empty_file_is_all_defaults() {
    let config = TomlConfig::parse("").unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_toml_rejects_unknown_and_mistyped_fields() {
    assert!(TomlConfig::parse("prot = 8080").is_err());
    assert!(TomlConfig::parse("port = \"eighty\"").is_err());
}

#[test]
fn test_toml_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 4000\n").unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.port, Some(4000));
}

#[test]
fn test_toml_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(TomlConfig::load(&dir.path().join("absent.toml")).is_err());
}
