//! Lazy logging guard
//!
//! `log_lazy` takes a message producer instead of a message, and only runs
//! it when the level is enabled for the active subscriber. Use it when
//! building the message is itself expensive (formatting option maps, large
//! pattern lists) and the level is usually off.
//!
//! The `tracing` macros already skip formatting of their arguments when
//! disabled; this guard covers call sites whose level is only known at
//! runtime.

use tracing::Level;

/// Log the message produced by `message` at `level`, evaluating it only if
/// that level is enabled.
///
/// Events carry this module as their target. Call sites that need filtering
/// by their own module use [`lazy_log!`](crate::lazy_log).
///
/// # Examples
///
/// ```
/// use agent_bootstrap::logging::log_lazy;
/// use tracing::Level;
///
/// log_lazy(Level::DEBUG, || format!("expensive: {:?}", vec![1, 2, 3]));
/// ```
pub fn log_lazy<F>(level: Level, message: F)
where
    F: FnOnce() -> String,
{
    if level == Level::ERROR {
        if tracing::enabled!(Level::ERROR) {
            tracing::error!("{}", message());
        }
    } else if level == Level::WARN {
        if tracing::enabled!(Level::WARN) {
            tracing::warn!("{}", message());
        }
    } else if level == Level::INFO {
        if tracing::enabled!(Level::INFO) {
            tracing::info!("{}", message());
        }
    } else if level == Level::DEBUG {
        if tracing::enabled!(Level::DEBUG) {
            tracing::debug!("{}", message());
        }
    } else if tracing::enabled!(Level::TRACE) {
        tracing::trace!("{}", message());
    }
}

/// Parse a textual log level (`error`, `warn`, `info`, `debug`, `trace`)
pub fn parse_level(text: &str) -> Option<Level> {
    text.trim().parse().ok()
}

#[doc(hidden)]
pub use tracing as __tracing;

/// Format and log only when the level is enabled
///
/// `lazy_log!(Level::DEBUG, "{} classes", count)`
///
/// Unlike [`log_lazy`], the check and the event happen at the call site, so
/// the event's target is the calling module and per-module filter directives
/// apply to it.
#[macro_export]
macro_rules! lazy_log {
    ($level:expr, $($arg:tt)+) => {{
        use $crate::logging::__tracing::{self, Level};
        let level: Level = $level;
        if level == Level::ERROR {
            if __tracing::enabled!(Level::ERROR) {
                __tracing::error!($($arg)+);
            }
        } else if level == Level::WARN {
            if __tracing::enabled!(Level::WARN) {
                __tracing::warn!($($arg)+);
            }
        } else if level == Level::INFO {
            if __tracing::enabled!(Level::INFO) {
                __tracing::info!($($arg)+);
            }
        } else if level == Level::DEBUG {
            if __tracing::enabled!(Level::DEBUG) {
                __tracing::debug!($($arg)+);
            }
        } else if __tracing::enabled!(Level::TRACE) {
            __tracing::trace!($($arg)+);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tracing_subscriber::filter::LevelFilter;

    fn subscriber(max: LevelFilter) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_max_level(max)
            .with_writer(std::io::sink)
            .finish()
    }

    #[test]
    fn test_producer_skipped_when_level_disabled() {
        let calls = Cell::new(0);
        tracing::subscriber::with_default(subscriber(LevelFilter::INFO), || {
            log_lazy(Level::DEBUG, || {
                calls.set(calls.get() + 1);
                "debug".to_string()
            });
            log_lazy(Level::TRACE, || {
                calls.set(calls.get() + 1);
                "trace".to_string()
            });
        });
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_producer_runs_when_level_enabled() {
        let calls = Cell::new(0);
        tracing::subscriber::with_default(subscriber(LevelFilter::INFO), || {
            log_lazy(Level::INFO, || {
                calls.set(calls.get() + 1);
                "info".to_string()
            });
            log_lazy(Level::ERROR, || {
                calls.set(calls.get() + 1);
                "error".to_string()
            });
        });
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_lazy_log_macro() {
        let calls = Cell::new(0);
        let counted = || {
            calls.set(calls.get() + 1);
            7
        };
        tracing::subscriber::with_default(subscriber(LevelFilter::WARN), || {
            crate::lazy_log!(Level::WARN, "value {}", counted());
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(Level::WARN));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_lazy_log_uses_call_site_target() {
        let macro_calls = Cell::new(0);
        let fn_calls = Cell::new(0);
        let filter = tracing_subscriber::EnvFilter::new("trace,agent_bootstrap::logging::tests=off");
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            crate::lazy_log!(Level::WARN, "{}", {
                macro_calls.set(macro_calls.get() + 1);
                "silenced"
            });
            log_lazy(Level::WARN, || {
                fn_calls.set(fn_calls.get() + 1);
                "logged".to_string()
            });
        });

        assert_eq!(macro_calls.get(), 0);
        assert_eq!(fn_calls.get(), 1);
    }
}
