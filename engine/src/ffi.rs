//! Exported native agent entry points
//!
//! Built as a `cdylib`, this crate is itself a native agent: the host calls
//! `Agent_OnLoad` and the bootstrap chain in [`crate::starter`] takes over.

use crate::loader::{JInt, JNI_OK};
use crate::starter::AgentStarter;
use std::ffi::{c_char, c_void, CStr};
use std::panic::{self, AssertUnwindSafe};

/// Host entry point
///
/// # Safety
///
/// Called by the host with its `JavaVM*`, the option string from the command
/// line (may be null) and the reserved pointer.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Agent_OnLoad(
    vm: *mut c_void,
    options: *const c_char,
    reserved: *mut c_void,
) -> JInt {
    let options = if options.is_null() {
        String::new()
    } else {
        CStr::from_ptr(options).to_string_lossy().into_owned()
    };

    guarded(|| AgentStarter::new().on_load(vm, &options, reserved))
}

/// Run `body`, turning a panic into `JNI_OK`
///
/// Unwinding across the host's frames is undefined. Requires `panic = "unwind"`
/// in the profile that builds the cdylib; under `abort` the host process dies.
fn guarded<F>(body: F) -> JInt
where
    F: FnOnce() -> JInt,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(code) => code,
        Err(_) => {
            tracing::error!("Bootstrap panicked, continuing without the agent");
            JNI_OK
        }
    }
}

/// Host shutdown hook
///
/// The chained agent stays mapped for the rest of the process, so nothing is
/// released here.
///
/// # Safety
///
/// Called by the host with its `JavaVM*`.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Agent_OnUnload(_vm: *mut c_void) {
    tracing::debug!("Agent_OnUnload");
}
