//! Windows loader back end (`LoadLibraryExW` / `GetProcAddress`)
//!
//! Windows has no lazy-binding flag: imports are bound when the DLL is
//! mapped. Forward slashes in the path are converted to backslashes first,
//! since agent paths are usually written in POSIX form in option strings.

use super::{AgentLibrary, AgentLoader, EntryPoint};
use libloading::os::windows::Library;
use sdk::errors::BootstrapError;
use std::ffi::c_void;
use std::path::{Path, PathBuf};

/// `LoadLibraryExW`-based loader
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsLoader;

/// Convert `/` separators to `\`
pub fn to_native_path(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('/', "\\"))
}

impl AgentLoader for WindowsLoader {
    fn load_symbol(&self, path: &Path, symbol: &str) -> Result<AgentLibrary, BootstrapError> {
        let native = to_native_path(path);
        tracing::debug!("LoadLibraryExW({}) for '{}'", native.display(), symbol);

        // SAFETY: mapping the library runs DllMain; that is the purpose of
        // this call and is documented on the module.
        let library =
            unsafe { Library::new(&native) }.map_err(|e| BootstrapError::LibraryLoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // SAFETY: the symbol is read as an untyped address and not called here.
        let address = unsafe { library.get::<*mut c_void>(symbol.as_bytes()) }
            .map(|sym| *sym)
            .map_err(|e| BootstrapError::SymbolNotFound {
                symbol: symbol.to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

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
