//! POSIX loader back end (`dlopen` / `dlsym`)
//!
//! Libraries are opened with `RTLD_LAZY`: the library's own undefined
//! function references are bound on first call rather than at load time, so
//! an agent with optional external references still loads.

use super::{AgentLibrary, AgentLoader, EntryPoint};
use libloading::os::unix::{Library, RTLD_LAZY};
use sdk::errors::BootstrapError;
use std::ffi::{c_int, c_void};
use std::path::Path;

/// `dlopen`-based loader
#[derive(Debug, Clone, Copy)]
pub struct PosixLoader {
    flags: c_int,
}

impl PosixLoader {
    pub fn flags(&self) -> c_int {
        self.flags
    }
}

impl Default for PosixLoader {
    fn default() -> Self {
        Self { flags: RTLD_LAZY }
    }
}

impl AgentLoader for PosixLoader {
    fn load_symbol(&self, path: &Path, symbol: &str) -> Result<AgentLibrary, BootstrapError> {
        tracing::debug!(
            "dlopen({}, {:#x}) for '{}'",
            path.display(),
            self.flags,
            symbol
        );

        // SAFETY: mapping the library runs its initializers; that is the
        // purpose of this call and is documented on the module.
        let library = unsafe { Library::open(Some(path), self.flags) }.map_err(|e| {
            BootstrapError::LibraryLoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        // SAFETY: the symbol is read as an untyped address and not called here.
        let address = unsafe { library.get::<*mut c_void>(symbol.as_bytes()) }
            .map(|sym| *sym)
            .map_err(|e| BootstrapError::SymbolNotFound {
                symbol: symbol.to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // dlsym can return null without setting dlerror() for a defined symbol
        let entry = EntryPoint::new(address).ok_or_else(|| BootstrapError::SymbolNotFound {
            symbol: symbol.to_string(),
            path: path.to_path_buf(),
            reason: "symbol resolved to a null address".to_string(),
        })?;

        Ok(AgentLibrary::new(
            path.to_path_buf(),
            symbol,
            entry,
            library.into(),
        ))
    }
}
