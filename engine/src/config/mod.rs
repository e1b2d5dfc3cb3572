//! Bootstrap configuration
//!
//! The bootstrap is started with a short option string on the host command
//! line. Everything else (most importantly the path of the native agent to
//! chain to) lives in a bootstrap configuration file named by the
//! `bootstrapConfigPath` option.
//!
//! # File formats
//!
//! - **Line format** (any extension except `.toml`): one `key=value` pair per
//!   line, LF or CRLF line endings, blank lines ignored
//! - **TOML** (`.toml` extension): a flat table; strings, numbers and booleans
//!   become their text form, arrays of strings are joined with `;`
//!
//! # Examples
//!
//! ```no_run
//! use agent_bootstrap::config::BootstrapConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BootstrapConfig::load_from_path(Path::new("/etc/agent/bootstrap.conf"))?;
//! println!("Agent: {}", config.agent_path()?.display());
//! # Ok(())
//! # }
//! ```

use crate::platform::to_unix_line_endings;
use sdk::errors::BootstrapError;
use sdk::params::AgentParams;
use std::fs;
use std::path::{Path, PathBuf};

/// Option naming the bootstrap configuration file
pub const BOOTSTRAP_CONFIG_PATH_KEY: &str = "bootstrapConfigPath";

/// Configuration key naming the native agent library to chain to
pub const AGENT_PATH_KEY: &str = "agentPath";

/// Option added for the chained agent, naming its own library path
pub const CORE_LIB_PATH_KEY: &str = "coreLibPath";

/// Option selecting the bootstrap's log level
pub const LOG_LEVEL_KEY: &str = "logLevel";

/// Separator used when a TOML array is flattened into one option value
const ARRAY_SEPARATOR: &str = ";";

/// Parsed bootstrap configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Where the configuration came from, if it was read from disk
    source: Option<PathBuf>,

    /// Every pair from the file
    params: AgentParams,
}

impl BootstrapConfig {
    /// Load a configuration file, choosing the format from its extension
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::Config` if the file cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, BootstrapError> {
        let path = expand_path(path)?;
        tracing::debug!("Loading bootstrap configuration from {}", path.display());

        let contents = fs::read_to_string(&path).map_err(|e| {
            BootstrapError::Config(format!(
                "Cannot open the config file with filePath='{}': {}",
                path.display(),
                e
            ))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let mut config = if is_toml {
            Self::from_toml_str(&contents)?
        } else {
            Self::from_lines_str(&contents)?
        };
        config.source = Some(path);

        tracing::debug!("Bootstrap configuration has {} entries", config.params.len());
        Ok(config)
    }

    /// Parse the line format
    pub fn from_lines_str(contents: &str) -> Result<Self, BootstrapError> {
        let params = AgentParams::from_lines(&to_unix_line_endings(contents))?;
        Ok(Self {
            source: None,
            params,
        })
    }

    /// Parse the TOML format
    pub fn from_toml_str(contents: &str) -> Result<Self, BootstrapError> {
        let table: toml::Table = toml::from_str(contents)
            .map_err(|e| BootstrapError::Config(format!("Failed to parse config: {}", e)))?;

        let mut params = AgentParams::new();
        for (key, value) in table {
            let text = toml_value_to_option(&key, value)?;
            params.insert(key, text);
        }

        Ok(Self {
            source: None,
            params,
        })
    }

    /// Default location of the configuration file used by the CLI
    ///
    /// `~/.agent-bootstrap/bootstrap.conf`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".agent-bootstrap").join("bootstrap.conf"))
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// Path of the native agent to chain to
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::MissingParameter` if `agentPath` is not set.
    pub fn agent_path(&self) -> Result<PathBuf, BootstrapError> {
        let raw = self.params.require(AGENT_PATH_KEY)?;
        expand_path(Path::new(raw))
    }
}

fn toml_value_to_option(key: &str, value: toml::Value) -> Result<String, BootstrapError> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                toml::Value::String(s) => Ok(s),
                other => Err(BootstrapError::Config(format!(
                    "Array '{}' must contain only strings, found {}",
                    key,
                    other.type_str()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|items| items.join(ARRAY_SEPARATOR)),
        other => Err(BootstrapError::Config(format!(
            "Unsupported value for '{}': {}",
            key,
            other.type_str()
        ))),
    }
}

/// Expand a leading `~` to the user's home directory
///
/// # Examples
///
/// ```ignore
/// let path = PathBuf::from("~/agents/libagent.so");
/// let expanded = expand_path(&path)?;
/// // expanded is now /home/user/agents/libagent.so (on Unix)
/// ```
fn expand_path(path: &Path) -> Result<PathBuf, BootstrapError> {
    let Some(path_str) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            BootstrapError::Config("Could not determine home directory".to_string())
        })?;
        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| BootstrapError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
