//! Agent Bootstrap SDK
//!
//! Shared library providing error types, agent option handling, and the
//! include/exclude pattern matcher. This crate is used by the bootstrap
//! engine and by agent-side filtering code.

/// Error types and handling
pub mod errors;

/// Include/exclude pattern matching
pub mod filter;

/// Agent option strings
pub mod params;

// Re-export commonly used types
pub use errors::{BootstrapError, BootstrapErrorExt};
pub use filter::{matches, ClassSource, Pattern, PatternSet};
pub use params::AgentParams;
