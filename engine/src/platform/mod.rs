//! Platform-specific utilities
//!
//! Naming conventions for shared libraries and line-ending handling for
//! configuration files written on a different OS than the one reading them.
//!
//! Everything here is selected with `#[cfg]` at build time.

/// Convert line endings to Unix format (LF)
///
/// Bootstrap configuration files are parsed line by line; a file saved on
/// Windows would otherwise leave a trailing `\r` in every value.
///
/// # Examples
///
/// ```
/// use agent_bootstrap::platform::to_unix_line_endings;
///
/// let text = "agentPath=/opt/libagent.so\r\nlogLevel=debug\r\n";
/// assert_eq!(to_unix_line_endings(text), "agentPath=/opt/libagent.so\nlogLevel=debug\n");
/// ```
pub fn to_unix_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Get the platform name as a string
///
/// Returns one of: "linux", "macos", "windows", "unknown"
///
/// # Examples
///
/// ```
/// use agent_bootstrap::platform::platform_name;
///
/// let name = platform_name();
/// assert!(["linux", "macos", "windows", "unknown"].contains(&name));
/// ```
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "linux")]
    return "linux";

    #[cfg(target_os = "macos")]
    return "macos";

    #[cfg(target_os = "windows")]
    return "windows";

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "unknown";
}

/// Name of the dynamic-linking facility used by the loader back end
pub fn loader_backend_name() -> &'static str {
    #[cfg(unix)]
    return "dlopen";

    #[cfg(windows)]
    return "LoadLibraryExW";
}

/// Get the platform-specific shared library extension
///
/// - Linux: "so"
/// - macOS: "dylib"
/// - Windows: "dll"
pub fn library_extension() -> &'static str {
    #[cfg(target_os = "linux")]
    return "so";

    #[cfg(target_os = "macos")]
    return "dylib";

    #[cfg(target_os = "windows")]
    return "dll";

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "so"; // Default to .so for other Unix flavours
}

/// Get the platform-specific shared library prefix
///
/// - Unix (Linux, macOS): "lib"
/// - Windows: "" (no prefix)
pub fn library_prefix() -> &'static str {
    #[cfg(unix)]
    return "lib";

    #[cfg(windows)]
    return "";
}

/// Construct a platform-specific library filename
///
/// # Examples
///
/// ```
/// use agent_bootstrap::platform::library_filename;
///
/// let filename = library_filename("drill_agent");
///
/// #[cfg(target_os = "linux")]
/// assert_eq!(filename, "libdrill_agent.so");
///
/// #[cfg(target_os = "macos")]
/// assert_eq!(filename, "libdrill_agent.dylib");
///
/// #[cfg(target_os = "windows")]
/// assert_eq!(filename, "drill_agent.dll");
/// ```
pub fn library_filename(name: &str) -> String {
    format!("{}{}.{}", library_prefix(), name, library_extension())
}
