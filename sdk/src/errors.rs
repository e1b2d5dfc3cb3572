//! Error types and handling
//!
//! This module provides the error types used throughout the agent bootstrap.
//! All errors implement the `BootstrapErrorExt` trait which provides
//! user-friendly hints and indicates whether errors are recoverable.
//!
//! # Diagnostics
//!
//! Loader errors keep the platform's own diagnostic text (`dlerror()` on
//! POSIX, the formatted `GetLastError()` message on Windows) in their
//! `reason` field so the caller can log it. The user hint never includes it.

use std::path::PathBuf;
use thiserror::Error;

/// Trait for bootstrap error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All bootstrap errors implement this trait.
pub trait BootstrapErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users and does not contain
    /// file paths or raw platform loader output.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be worked around by the caller, for example by
    /// retrying with an alternate library path or a corrected option string.
    fn is_recoverable(&self) -> bool;
}

/// Main bootstrap error type
///
/// # Error Categories
///
/// - **Loading**: the platform could not map the library, or the library does
///   not export the expected entry symbol
/// - **Configuration**: unreadable or malformed bootstrap configuration
/// - **Parameters**: malformed agent option strings, missing required keys
///
/// # Examples
///
/// ```
/// use sdk::errors::{BootstrapError, BootstrapErrorExt};
///
/// let error = BootstrapError::MissingParameter("agentPath".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal = BootstrapError::SymbolNotFound {
///     symbol: "Agent_OnLoad".to_string(),
///     path: "libagent.so".into(),
///     reason: "undefined symbol: Agent_OnLoad".to_string(),
/// };
/// assert!(!fatal.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum BootstrapError {
    // Library loading errors
    #[error("Library load failed for {path:?}: {reason}")]
    LibraryLoadFailed { path: PathBuf, reason: String },

    #[error("Symbol '{symbol}' not found in {path:?}: {reason}")]
    SymbolNotFound {
        symbol: String,
        path: PathBuf,
        reason: String,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Agent parameter errors
    #[error("Missing agent parameter: {0}")]
    MissingParameter(String),

    #[error("Wrong agent parameters: {0}")]
    InvalidParameters(String),
}

impl BootstrapErrorExt for BootstrapError {
    fn user_hint(&self) -> &str {
        match self {
            // Library loading errors
            Self::LibraryLoadFailed { .. } => {
                "Failed to load the native agent. Check agentPath and the library architecture"
            }
            Self::SymbolNotFound { .. } => "Native agent library is incompatible",

            // Configuration errors
            Self::Config(_) => "Check the bootstrap configuration file for errors",

            // Agent parameter errors
            Self::MissingParameter(_) => "A required agent option is missing",
            Self::InvalidParameters(_) => "Agent options must be key=value pairs",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Non-recoverable errors
            Self::SymbolNotFound { .. } => false,

            // A different path may still load
            _ => true,
        }
    }
}
