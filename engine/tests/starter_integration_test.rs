//! Integration tests for the bootstrap chain
//!
//! The chain is exercised up to the point of calling into the agent; the
//! crate's own cdylib stands in for the native agent where one is needed.

mod common;

use agent_bootstrap::loader::{AGENT_ON_LOAD_SYMBOL, JNI_OK};
use agent_bootstrap::starter::{AgentStarter, ChainPlan};
use sdk::errors::BootstrapError;
use std::fs;
use std::path::{Path, PathBuf};

fn write_config(dir: &Path, agent_path: &Path, extra: &str) -> PathBuf {
    let path = dir.join("bootstrap.conf");
    fs::write(&path, format!("agentPath={}\n{}", agent_path.display(), extra)).unwrap();
    path
}

#[test]
fn test_prepare_loads_configured_agent() {
    let Some(agent) = common::own_cdylib() else {
        eprintln!("agent_bootstrap cdylib not found, skipping");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &agent, "logLevel=debug\n");
    let options = format!("bootstrapConfigPath={},logLevel=info", config.display());

    let prepared = AgentStarter::new().prepare(&options).unwrap().unwrap();
    assert_eq!(prepared.library.symbol(), AGENT_ON_LOAD_SYMBOL);
    assert_eq!(prepared.plan.agent_path, agent);
    assert_eq!(prepared.plan.options.get("logLevel"), Some("debug"));
    assert_eq!(
        prepared.plan.options.get("coreLibPath"),
        Some(agent.to_string_lossy().as_ref())
    );
}

#[test]
fn test_prepare_without_config_path() {
    assert!(AgentStarter::new().prepare("logLevel=info").unwrap().is_none());
}

#[test]
fn test_prepare_with_bad_agent_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), Path::new("/nonexistent/libagent.so"), "");
    let options = format!("bootstrapConfigPath={}", config.display());

    let err = AgentStarter::new().prepare(&options).unwrap_err();
    assert!(matches!(err, BootstrapError::LibraryLoadFailed { .. }));
}

#[test]
fn test_on_load_with_bad_agent_path_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), Path::new("/nonexistent/libagent.so"), "");
    let options = format!("bootstrapConfigPath={}", config.display());

    let code = unsafe {
        AgentStarter::new().on_load(std::ptr::null_mut(), &options, std::ptr::null_mut())
    };
    assert_eq!(code, JNI_OK);
}

#[test]
fn test_on_load_without_config_is_ok() {
    let code = unsafe {
        AgentStarter::new().on_load(std::ptr::null_mut(), "", std::ptr::null_mut())
    };
    assert_eq!(code, JNI_OK);
}

#[test]
fn test_config_overrides_core_lib_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        Path::new("/opt/agent/libagent.so"),
        "coreLibPath=/opt/agent/override.so\n",
    );
    let options = format!("bootstrapConfigPath={}", config.display());

    let plan = ChainPlan::from_options(&options).unwrap().unwrap();
    assert_eq!(plan.options.get("coreLibPath"), Some("/opt/agent/override.so"));
}

#[test]
fn test_plan_options_cstring() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), Path::new("/opt/agent/libagent.so"), "");
    let options = format!("bootstrapConfigPath={}", config.display());

    let plan = ChainPlan::from_options(&options).unwrap().unwrap();
    let c_options = plan.options_cstring().unwrap();
    assert_eq!(
        c_options.to_str().unwrap(),
        format!(
            "bootstrapConfigPath={},coreLibPath=/opt/agent/libagent.so,agentPath=/opt/agent/libagent.so",
            config.display()
        )
    );
}
