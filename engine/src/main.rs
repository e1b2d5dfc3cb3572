// Agent bootstrap diagnostics
// Main entry point for the agent-bootstrap binary

use agent_bootstrap::cli::{Cli, Command};
use agent_bootstrap::handlers::{handle_match, handle_options, handle_probe, OutputFormat};
use agent_bootstrap::telemetry::{init_telemetry, init_telemetry_with_level};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.log {
        Some(level) => init_telemetry_with_level(level),
        None => init_telemetry(),
    };

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::debug!("agent-bootstrap v{} ({} - {})", version, commit, timestamp);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Command::Probe { path, symbol } => handle_probe(&path, &symbol, format),

        Command::Match {
            candidate,
            patterns,
            offset,
            super_name,
        } => handle_match(&candidate, super_name.as_deref(), &patterns, offset, format),

        Command::Options { options, config } => handle_options(&options, config.as_deref(), format),
    }
}
