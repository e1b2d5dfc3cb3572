//! Native agent loader
//!
//! Maps a native agent library into the process and resolves its well-known
//! entry symbol, `Agent_OnLoad`.
//!
//! # Platform back ends
//!
//! The [`AgentLoader`] trait is the only thing callers depend on. Each target
//! platform provides one implementation, selected at build time:
//!
//! - Unix (Linux, macOS, BSD): [`PosixLoader`], `dlopen(path, RTLD_LAZY)` + `dlsym`
//! - Windows: [`WindowsLoader`], `LoadLibraryExW` + `GetProcAddress`
//!
//! [`PlatformLoader`] names the back end for the current target.
//!
//! # Failure handling
//!
//! [`load_agent_entry_point`] collapses every failure (missing file, wrong
//! format, unresolved dependencies, missing symbol) into `None` after logging
//! the platform diagnostic. [`try_load_agent_entry_point`] returns the
//! diagnostic as a [`BootstrapError`] instead.
//!
//! # Side effects
//!
//! A successful load runs the library's static initializers (ELF `.init_array`,
//! Mach-O initializers, `DllMain`) before this module regains control.
//!
//! # Examples
//!
//! ```no_run
//! use agent_bootstrap::loader::load_agent_entry_point;
//!
//! match load_agent_entry_point("/opt/agent/libagent.so") {
//!     Some(agent) => println!("Agent_OnLoad at {:?}", agent.entry_point()),
//!     None => eprintln!("agent not available"),
//! }
//! ```

use crate::lazy_log;
use sdk::errors::BootstrapError;
use std::ffi::{c_char, c_void, CStr};
use std::fmt;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use tracing::Level;

#[cfg(unix)]
pub mod posix;
#[cfg(windows)]
pub mod windows;

#[cfg(unix)]
pub use posix::PosixLoader;
#[cfg(windows)]
pub use windows::WindowsLoader;

/// Loader back end for the current target
#[cfg(unix)]
pub type PlatformLoader = PosixLoader;

/// Loader back end for the current target
#[cfg(windows)]
pub type PlatformLoader = WindowsLoader;

/// Export name every loadable native agent must provide (case-sensitive)
pub const AGENT_ON_LOAD_SYMBOL: &str = "Agent_OnLoad";

/// JNI `jint`
pub type JInt = i32;

/// Success return code of `Agent_OnLoad`
pub const JNI_OK: JInt = 0;

/// Generic failure return code of `Agent_OnLoad`
pub const JNI_ERR: JInt = -1;

/// Signature of `Agent_OnLoad(JavaVM *vm, char *options, void *reserved)`
pub type AgentOnLoadFn =
    unsafe extern "system" fn(vm: *mut c_void, options: *const c_char, reserved: *mut c_void) -> JInt;

/// Untyped address of a resolved entry symbol
///
/// Only meaningful while the [`AgentLibrary`] it came from stays mapped.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryPoint(NonNull<c_void>);

// SAFETY: an EntryPoint is an address, never dereferenced through this type.
// Calling it goes through AgentLibrary::invoke_on_load, which borrows the library.
unsafe impl Send for EntryPoint {}
unsafe impl Sync for EntryPoint {}

impl EntryPoint {
    /// Wrap a resolved address; `None` for null
    pub fn new(address: *mut c_void) -> Option<Self> {
        NonNull::new(address).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryPoint({:p})", self.0)
    }
}

/// A mapped native library together with its resolved entry symbol
///
/// Dropping it unmaps the library. Bootstrap code that hands control to the
/// agent keeps it for the rest of the process with
/// [`AgentLibrary::into_process_lifetime`].
pub struct AgentLibrary {
    path: PathBuf,
    symbol: String,
    entry: EntryPoint,
    // Unmapped on drop; `entry` is only valid while this is alive
    _library: libloading::Library,
}

impl AgentLibrary {
    pub(crate) fn new(
        path: PathBuf,
        symbol: &str,
        entry: EntryPoint,
        library: libloading::Library,
    ) -> Self {
        Self {
            path,
            symbol: symbol.to_string(),
            entry,
            _library: library,
        }
    }

    /// Path the library was loaded from, as given by the caller
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the resolved symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry
    }

    /// Keep the library mapped until the process exits
    pub fn into_process_lifetime(self) -> &'static AgentLibrary {
        Box::leak(Box::new(self))
    }

    /// Call the resolved entry point as `Agent_OnLoad`
    ///
    /// This is the only place the untyped address is turned into a callable.
    ///
    /// # Safety
    ///
    /// - the resolved symbol must be `Agent_OnLoad` with the [`AgentOnLoadFn`]
    ///   signature and calling convention
    /// - `vm` and `reserved` must be whatever the native agent protocol
    ///   expects; the agent may dereference them
    /// - the agent runs arbitrary native code on the calling thread
    pub unsafe fn invoke_on_load(
        &self,
        vm: *mut c_void,
        options: &CStr,
        reserved: *mut c_void,
    ) -> JInt {
        debug_assert_eq!(self.symbol, AGENT_ON_LOAD_SYMBOL);
        let on_load = std::mem::transmute::<*mut c_void, AgentOnLoadFn>(self.entry.as_ptr());
        on_load(vm, options.as_ptr(), reserved)
    }
}

impl fmt::Debug for AgentLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentLibrary")
            .field("path", &self.path)
            .field("symbol", &self.symbol)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// Platform dynamic-linking back end
pub trait AgentLoader {
    /// Map the library at `path` and resolve `symbol` in it
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::LibraryLoadFailed` if the platform cannot map the library.
    /// Returns `BootstrapError::SymbolNotFound` if the symbol is absent or resolves to null.
    fn load_symbol(&self, path: &Path, symbol: &str) -> Result<AgentLibrary, BootstrapError>;

    /// Map the library at `path` and resolve `Agent_OnLoad` in it
    fn load(&self, path: &Path) -> Result<AgentLibrary, BootstrapError> {
        self.load_symbol(path, AGENT_ON_LOAD_SYMBOL)
    }
}

/// Load a native agent and resolve `Agent_OnLoad`, keeping the platform error
///
/// # Errors
///
/// See [`AgentLoader::load_symbol`].
pub fn try_load_agent_entry_point(path: impl AsRef<Path>) -> Result<AgentLibrary, BootstrapError> {
    PlatformLoader::default().load(path.as_ref())
}

/// Load a native agent and resolve `Agent_OnLoad`
///
/// Returns `None` if the library cannot be mapped or does not export the
/// symbol. The platform diagnostic is logged at `WARN`.
pub fn load_agent_entry_point(path: impl AsRef<Path>) -> Option<AgentLibrary> {
    let path = path.as_ref();
    match try_load_agent_entry_point(path) {
        Ok(agent) => {
            tracing::debug!("Resolved {:?} in {}", agent.entry_point(), path.display());
            Some(agent)
        }
        Err(e) => {
            lazy_log!(Level::WARN, "Native agent not available: {}", e);
            None
        }
    }
}
