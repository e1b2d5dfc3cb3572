//! Bootstrap chain
//!
//! When the bootstrap library is itself loaded as a native agent, the host
//! calls its `Agent_OnLoad` with a short option string. The chain:
//!
//! 1. parse the host options (`key=value,key=value`)
//! 2. stop quietly if `bootstrapConfigPath` is absent
//! 3. read the bootstrap configuration file and its `agentPath`
//! 4. load the native agent at `agentPath` and resolve its `Agent_OnLoad`
//! 5. build the final options: host options, then `coreLibPath=<agentPath>`,
//!    then every configuration entry (configuration wins on conflicts)
//! 6. hand control to the agent's `Agent_OnLoad` and return its result
//!
//! Failures in steps 1 to 5 are logged and reported to the host as `JNI_OK`: the
//! host keeps running without the agent.

use crate::config::{
    BootstrapConfig, AGENT_PATH_KEY, BOOTSTRAP_CONFIG_PATH_KEY, CORE_LIB_PATH_KEY, LOG_LEVEL_KEY,
};
use crate::loader::{AgentLibrary, AgentLoader, JInt, PlatformLoader, JNI_OK};
use crate::lazy_log;
use crate::logging::parse_level;
use crate::telemetry::{init_telemetry_with_level, DEFAULT_LOG_LEVEL};
use sdk::errors::BootstrapError;
use sdk::params::AgentParams;
use std::ffi::{c_void, CString};
use std::path::{Path, PathBuf};
use tracing::Level;

/// What the chain will load and the options it will pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPlan {
    pub agent_path: PathBuf,
    pub options: AgentParams,
}

impl ChainPlan {
    /// Build a plan from the host option string
    ///
    /// Returns `Ok(None)` when the options do not name a bootstrap
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::InvalidParameters` for malformed options and any
    /// error from [`BootstrapConfig::load_from_path`] or a missing `agentPath`.
    pub fn from_options(options: &str) -> Result<Option<Self>, BootstrapError> {
        let initial = AgentParams::from_options(options)?;
        let Some(config_path) = initial.get(BOOTSTRAP_CONFIG_PATH_KEY) else {
            return Ok(None);
        };

        let config = BootstrapConfig::load_from_path(Path::new(config_path))?;
        Self::from_parts(&initial, &config).map(Some)
    }

    /// Merge already-parsed host options with a loaded configuration
    pub fn from_parts(initial: &AgentParams, config: &BootstrapConfig) -> Result<Self, BootstrapError> {
        let agent_path = config.agent_path()?;

        let mut options = initial.clone();
        // The chained agent sees the path exactly as configured
        options.insert(CORE_LIB_PATH_KEY, config.params().require(AGENT_PATH_KEY)?);
        options.extend_from(config.params());

        Ok(Self {
            agent_path,
            options,
        })
    }

    /// Final options as a C string for `Agent_OnLoad`
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::InvalidParameters` if an option contains a NUL byte.
    pub fn options_cstring(&self) -> Result<CString, BootstrapError> {
        CString::new(self.options.render())
            .map_err(|e| BootstrapError::InvalidParameters(format!("NUL byte in options: {}", e)))
    }
}

/// A loaded agent and the options it will be started with
#[derive(Debug)]
pub struct PreparedAgent {
    pub library: AgentLibrary,
    pub plan: ChainPlan,
}

/// Runs the bootstrap chain with a given loader back end
#[derive(Debug, Clone, Default)]
pub struct AgentStarter<L = PlatformLoader> {
    loader: L,
}

impl AgentStarter<PlatformLoader> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: AgentLoader> AgentStarter<L> {
    pub fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    /// Everything up to, but not including, the call into the agent
    ///
    /// Returns `Ok(None)` when the options do not name a bootstrap
    /// configuration file; nothing is loaded in that case.
    pub fn prepare(&self, options: &str) -> Result<Option<PreparedAgent>, BootstrapError> {
        let Some(plan) = ChainPlan::from_options(options)? else {
            return Ok(None);
        };
        let library = self.loader.load(&plan.agent_path)?;
        Ok(Some(PreparedAgent { library, plan }))
    }

    /// Run the chain for the host's `Agent_OnLoad`
    ///
    /// Returns the chained agent's result, or `JNI_OK` if the chain stopped early.
    ///
    /// # Safety
    ///
    /// `vm` and `reserved` are passed unchanged to the chained agent's
    /// `Agent_OnLoad`; they must be what the host passed to ours.
    pub unsafe fn on_load(&self, vm: *mut c_void, options: &str, reserved: *mut c_void) -> JInt {
        init_telemetry_with_level(&log_level_of(options));

        let prepared = match self.prepare(options) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => {
                tracing::info!(
                    "No {} in agent options, nothing to chain",
                    BOOTSTRAP_CONFIG_PATH_KEY
                );
                return JNI_OK;
            }
            Err(e) => {
                tracing::error!("Bootstrap aborted: {}", e);
                return JNI_OK;
            }
        };

        let PreparedAgent { library, plan } = prepared;
        let c_options = match plan.options_cstring() {
            Ok(c_options) => c_options,
            Err(e) => {
                tracing::error!("Bootstrap aborted: {}", e);
                return JNI_OK;
            }
        };

        let agent = library.into_process_lifetime();
        lazy_log!(
            Level::DEBUG,
            "Chaining to {} with options: {}",
            plan.agent_path.display(),
            plan.options
        );
        tracing::info!(
            "Native agent loaded from {}, calling {}",
            agent.path().display(),
            agent.symbol()
        );

        let code = agent.invoke_on_load(vm, &c_options, reserved);
        tracing::info!("Native agent returned {}", code);
        code
    }
}

/// `logLevel` from the host options, or the default when absent or not a level
fn log_level_of(options: &str) -> String {
    AgentParams::from_options(options)
        .ok()
        .and_then(|params| {
            params
                .get(LOG_LEVEL_KEY)
                .filter(|level| parse_level(level).is_some())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}
