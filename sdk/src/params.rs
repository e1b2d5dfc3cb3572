//! Agent option strings
//!
//! Native agents receive their options as one flat string, conventionally
//! `key=value` pairs separated by commas (`-agentpath:lib.so=a=1,b=2`). The
//! bootstrap configuration file uses the same pairs, one per line.
//!
//! [`AgentParams`] keeps insertion order so a rendered option string lists
//! keys in the order they were first seen.

use crate::errors::BootstrapError;
use std::fmt;

/// Separator between pairs on the agent command line
pub const OPTION_DELIMITER: &str = ",";

/// Separator between pairs in a bootstrap configuration file
pub const LINE_DELIMITER: &str = "\n";

/// Separator between a key and its value
pub const MAP_DELIMITER: &str = "=";

/// Insertion-ordered `key=value` agent options
///
/// # Examples
///
/// ```
/// use sdk::params::AgentParams;
///
/// let mut params = AgentParams::from_options("bootstrapConfigPath=/etc/agent.conf,logLevel=debug")?;
/// assert_eq!(params.get("logLevel"), Some("debug"));
///
/// params.insert("coreLibPath", "/opt/agent/libagent.so");
/// assert_eq!(
///     params.render(),
///     "bootstrapConfigPath=/etc/agent.conf,logLevel=debug,coreLibPath=/opt/agent/libagent.so"
/// );
/// # Ok::<(), sdk::errors::BootstrapError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentParams {
    entries: Vec<(String, String)>,
}

impl AgentParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` into pairs
    ///
    /// Absent or empty text yields no pairs. Empty entries between delimiters
    /// are skipped. Each entry is split at the first `map_delimiter`, so values
    /// may themselves contain it. An entry with no `map_delimiter` at all makes
    /// the whole text invalid.
    pub fn parse(
        text: Option<&str>,
        line_delimiter: &str,
        map_delimiter: &str,
    ) -> Result<Self, BootstrapError> {
        let mut params = Self::new();
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(params);
        };

        for entry in text.split(line_delimiter).filter(|e| !e.is_empty()) {
            // Only the first delimiter splits: `jvmArgs=-Dx=y` keeps `-Dx=y`
            // whole instead of truncating the value at the second `=`
            let (key, value) = entry
                .split_once(map_delimiter)
                .ok_or_else(|| BootstrapError::InvalidParameters(text.to_string()))?;
            params.insert(key, value);
        }

        Ok(params)
    }

    /// Parse a comma-separated agent command-line option string
    pub fn from_options(text: &str) -> Result<Self, BootstrapError> {
        Self::parse(Some(text), OPTION_DELIMITER, MAP_DELIMITER)
    }

    /// Parse newline-separated pairs, as found in a bootstrap configuration file
    pub fn from_lines(text: &str) -> Result<Self, BootstrapError> {
        Self::parse(Some(text), LINE_DELIMITER, MAP_DELIMITER)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get a required value
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::MissingParameter` if `key` is absent.
    pub fn require(&self, key: &str) -> Result<&str, BootstrapError> {
        self.get(key)
            .ok_or_else(|| BootstrapError::MissingParameter(key.to_string()))
    }

    /// Set `key` to `value`
    ///
    /// An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert every pair of `other`, overriding existing keys
    pub fn extend_from(&mut self, other: &AgentParams) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a comma-separated option string
    pub fn render(&self) -> String {
        self.render_with(OPTION_DELIMITER)
    }

    pub fn render_with(&self, delimiter: &str) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}{MAP_DELIMITER}{v}"))
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

impl fmt::Display for AgentParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AgentParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
