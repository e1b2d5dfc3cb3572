//! Command handlers for CLI operations
//!
//! - probe: load a library and resolve a symbol
//! - match: evaluate include/exclude patterns against a name
//! - options: preview the chained agent's option string
//!
//! Each handler builds a serializable report and prints it as text or JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{BootstrapConfig, BOOTSTRAP_CONFIG_PATH_KEY};
use crate::loader::{AgentLoader, PlatformLoader};
use crate::platform::{loader_backend_name, platform_name};
use crate::starter::ChainPlan;
use sdk::errors::BootstrapErrorExt;
use sdk::filter::ClassSource;
use sdk::params::AgentParams;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Outcome of `probe`
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub path: PathBuf,
    pub symbol: String,
    pub platform: &'static str,
    pub backend: &'static str,
    pub loaded: bool,
    pub address: Option<String>,
    pub error: Option<String>,
    pub hint: Option<String>,
}

/// Outcome of `match`
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub candidate: String,
    pub super_name: Option<String>,
    pub patterns: Vec<String>,
    pub offset: usize,
    pub matched: bool,
}

/// Outcome of `options`
#[derive(Debug, Clone, Serialize)]
pub struct OptionsReport {
    pub config: Option<PathBuf>,
    pub agent_path: PathBuf,
    pub options: String,
}

/// Load `path` with the platform back end and resolve `symbol`
///
/// The library is unmapped again when the report is built.
pub fn probe(path: &Path, symbol: &str) -> ProbeReport {
    let mut report = ProbeReport {
        path: path.to_path_buf(),
        symbol: symbol.to_string(),
        platform: platform_name(),
        backend: loader_backend_name(),
        loaded: false,
        address: None,
        error: None,
        hint: None,
    };

    match PlatformLoader::default().load_symbol(path, symbol) {
        Ok(library) => {
            report.loaded = true;
            report.address = Some(format!("{:p}", library.entry_point().as_ptr()));
        }
        Err(e) => {
            tracing::debug!("Probe of {} failed: {}", path.display(), e);
            report.error = Some(e.to_string());
            report.hint = Some(e.user_hint().to_string());
        }
    }

    report
}

pub fn handle_probe(path: &Path, symbol: &str, format: OutputFormat) -> Result<()> {
    let report = probe(path, symbol);

    match format {
        OutputFormat::Text => {
            if let Some(address) = &report.address {
                println!("✓ {} resolved in {}", report.symbol, report.path.display());
                println!("  Address: {}", address);
                println!("  Backend: {} ({})", report.backend, report.platform);
            } else {
                println!("✗ {} not available from {}", report.symbol, report.path.display());
                if let Some(error) = &report.error {
                    println!("  Error: {}", error);
                }
                if let Some(hint) = &report.hint {
                    println!("  Hint: {}", hint);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if !report.loaded {
        anyhow::bail!("probe of {} failed", report.path.display());
    }
    Ok(())
}

/// Evaluate `patterns` against `candidate`
pub fn match_candidate(
    candidate: &str,
    super_name: Option<&str>,
    patterns: &[String],
    offset: usize,
) -> MatchReport {
    let mut source = ClassSource::new(candidate);
    if let Some(super_name) = super_name {
        source = source.with_super(super_name);
    }

    MatchReport {
        candidate: candidate.to_string(),
        super_name: super_name.map(str::to_owned),
        patterns: patterns.to_vec(),
        offset,
        matched: source.matches(patterns, offset),
    }
}

pub fn handle_match(
    candidate: &str,
    super_name: Option<&str>,
    patterns: &[String],
    offset: usize,
    format: OutputFormat,
) -> Result<()> {
    let report = match_candidate(candidate, super_name, patterns, offset);

    match format {
        OutputFormat::Text => {
            if report.matched {
                println!("✓ {} is included", report.candidate);
            } else {
                println!("✗ {} is excluded", report.candidate);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Compute the chained agent's options without loading anything
///
/// The configuration file is `config` if given, else `bootstrapConfigPath`
/// from `options`, else the default location.
pub fn preview_options(options: &str, config: Option<&Path>) -> Result<OptionsReport> {
    let initial = AgentParams::from_options(options).context("Failed to parse agent options")?;

    let config_path = match config {
        Some(path) => path.to_path_buf(),
        None => initial
            .get(BOOTSTRAP_CONFIG_PATH_KEY)
            .map(PathBuf::from)
            .or_else(BootstrapConfig::default_path)
            .context("No bootstrap configuration file given")?,
    };

    let config = BootstrapConfig::load_from_path(&config_path)?;
    let plan = ChainPlan::from_parts(&initial, &config)?;

    Ok(OptionsReport {
        config: config.source().map(Path::to_path_buf),
        agent_path: plan.agent_path,
        options: plan.options.render(),
    })
}

pub fn handle_options(options: &str, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let report = preview_options(options, config)?;

    match format {
        OutputFormat::Text => {
            if let Some(config) = &report.config {
                println!("Config: {}", config.display());
            }
            println!("Agent:  {}", report.agent_path.display());
            println!("Options:");
            println!("{}", report.options);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
