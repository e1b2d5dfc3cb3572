//! Agent Bootstrap Library
//!
//! Loads a native agent library, resolves its `Agent_OnLoad` entry point and
//! chains to it with merged options. Built as a `cdylib`, the crate is itself
//! a native agent; as an `rlib` it backs the `agent-bootstrap` CLI and the
//! integration tests.

/// Bootstrap configuration files
pub mod config;

/// Exported `Agent_OnLoad` / `Agent_OnUnload`
pub mod ffi;

/// Native library loader
pub mod loader;

/// Bootstrap chain
pub mod starter;

/// Lazily evaluated log messages
pub mod logging;

/// Platform-specific utilities
pub mod platform;

/// Tracing subscriber setup
pub mod telemetry;

/// CLI interface
pub mod cli;

/// Command handlers
pub mod handlers;
