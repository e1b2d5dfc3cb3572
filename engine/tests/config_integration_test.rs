//! Integration tests for bootstrap configuration files
//!
//! These tests write real files to a temporary directory and load them
//! through the public API.

use agent_bootstrap::config::{BootstrapConfig, AGENT_PATH_KEY, LOG_LEVEL_KEY};
use sdk::errors::BootstrapError;
use sdk::filter::PatternSet;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_load_line_format_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bootstrap.conf");
    fs::write(
        &path,
        "agentPath=/opt/drill/libdrill_agent.so\nlogLevel=debug\n\ndrillInstallationDir=/opt/drill\n",
    )
    .unwrap();

    let config = BootstrapConfig::load_from_path(&path).unwrap();
    assert_eq!(config.source(), Some(path.as_path()));
    assert_eq!(config.params().len(), 3);
    assert_eq!(config.get(LOG_LEVEL_KEY), Some("debug"));
    assert_eq!(
        config.agent_path().unwrap(),
        PathBuf::from("/opt/drill/libdrill_agent.so")
    );
}

#[test]
fn test_load_windows_line_endings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bootstrap.conf");
    fs::write(&path, "agentPath=C:/drill/drill_agent.dll\r\nlogLevel=info\r\n").unwrap();

    let config = BootstrapConfig::load_from_path(&path).unwrap();
    assert_eq!(config.get(AGENT_PATH_KEY), Some("C:/drill/drill_agent.dll"));
    assert_eq!(config.get(LOG_LEVEL_KEY), Some("info"));
}

#[test]
fn test_load_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bootstrap.toml");
    fs::write(
        &path,
        r#"
agentPath = "/opt/drill/libdrill_agent.so"
logLevel = "warn"
packagePrefixes = ["com/acme", "!com/acme/generated"]
"#,
    )
    .unwrap();

    let config = BootstrapConfig::load_from_path(&path).unwrap();
    assert_eq!(config.get(LOG_LEVEL_KEY), Some("warn"));

    let prefixes = PatternSet::from_option(config.get("packagePrefixes").unwrap());
    assert_eq!(prefixes.len(), 2);
    assert!(prefixes.matches("com/acme/Service"));
    assert!(!prefixes.matches("com/acme/generated/Stub"));
}

#[test]
fn test_toml_extension_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bootstrap.TOML");
    fs::write(&path, "agentPath = \"/opt/agent.so\"\n").unwrap();

    let config = BootstrapConfig::load_from_path(&path).unwrap();
    assert_eq!(config.get(AGENT_PATH_KEY), Some("/opt/agent.so"));
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.conf");

    match BootstrapConfig::load_from_path(&path) {
        Err(BootstrapError::Config(msg)) => {
            assert!(msg.contains("Cannot open the config file"));
            assert!(msg.contains("absent.conf"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bootstrap.toml");
    fs::write(&path, "agentPath = \n").unwrap();

    assert!(matches!(
        BootstrapConfig::load_from_path(&path),
        Err(BootstrapError::Config(_))
    ));
}

#[test]
fn test_malformed_line_is_invalid_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bootstrap.conf");
    fs::write(&path, "agentPath=/opt/agent.so\njust some words\n").unwrap();

    assert!(matches!(
        BootstrapConfig::load_from_path(&path),
        Err(BootstrapError::InvalidParameters(_))
    ));
}
