//! CLI interface for agent-bootstrap
//!
//! Diagnostics for the bootstrap chain without starting a host process:
//! probe a library for its entry symbol, try class-name filters, and preview
//! the option string a chained agent would receive.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Native agent bootstrap diagnostics
#[derive(Parser, Debug)]
#[command(name = "agent-bootstrap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a native library and resolve its entry symbol
    Probe {
        /// Path of the library to load
        path: PathBuf,

        /// Symbol to resolve
        #[arg(long, default_value = "Agent_OnLoad")]
        symbol: String,
    },

    /// Test a name against include/exclude prefix patterns
    Match {
        /// Name to test, e.g. a class name
        candidate: String,

        /// Pattern; prefix with `!` to exclude (repeatable)
        #[arg(short, long = "pattern", value_name = "PATTERN")]
        patterns: Vec<String>,

        /// Byte offset into the candidate where comparison starts
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Superclass name, for `!subclassOf:` patterns
        #[arg(long, value_name = "NAME")]
        super_name: Option<String>,
    },

    /// Show the option string the chained agent would receive
    Options {
        /// Host option string, e.g. "bootstrapConfigPath=/etc/agent.conf"
        options: String,

        /// Bootstrap configuration file, overriding `bootstrapConfigPath`
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["agent-bootstrap", "--json", "--log", "debug", "probe", "/x.so"]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
    }

    #[test]
    fn test_probe_default_symbol() {
        let cli = Cli::parse_from(["agent-bootstrap", "probe", "/opt/agent/libagent.so"]);
        if let Command::Probe { path, symbol } = cli.command {
            assert_eq!(path, PathBuf::from("/opt/agent/libagent.so"));
            assert_eq!(symbol, "Agent_OnLoad");
        } else {
            panic!("Expected Probe command");
        }
    }

    #[test]
    fn test_match_command() {
        let cli = Cli::parse_from([
            "agent-bootstrap",
            "match",
            "com/acme/Foo",
            "-p",
            "com/acme",
            "--pattern",
            "!com/acme/gen",
            "--offset",
            "0",
        ]);
        if let Command::Match {
            candidate,
            patterns,
            offset,
            super_name,
        } = cli.command
        {
            assert_eq!(candidate, "com/acme/Foo");
            assert_eq!(patterns, vec!["com/acme", "!com/acme/gen"]);
            assert_eq!(offset, 0);
            assert!(super_name.is_none());
        } else {
            panic!("Expected Match command");
        }
    }

    #[test]
    fn test_match_accepts_negated_pattern_value() {
        let cli = Cli::parse_from(["agent-bootstrap", "match", "Foo", "-p", "!Bar"]);
        assert!(matches!(cli.command, Command::Match { patterns, .. } if patterns == ["!Bar"]));
    }

    #[test]
    fn test_options_command() {
        let cli = Cli::parse_from([
            "agent-bootstrap",
            "options",
            "logLevel=debug",
            "--config",
            "/etc/agent/bootstrap.conf",
        ]);
        if let Command::Options { options, config } = cli.command {
            assert_eq!(options, "logLevel=debug");
            assert_eq!(config, Some(PathBuf::from("/etc/agent/bootstrap.conf")));
        } else {
            panic!("Expected Options command");
        }
    }
}
