//! Logging bootstrap.
//!
//! # Invariants
//! - Initialization is idempotent for the same level.
//! - Re-initialization with a different level is rejected.
//! - Initialization never panics.
//!
//! Library code only talks to the `log` facade; messages use
//! `event=... module=... status=...` pairs so they stay greppable.

use flexi_logger::{Logger, LoggerHandle, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const SUPPORTED_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Starts a stderr logger at `level`; a blank level means
/// [`default_log_level`].
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when logging is already active at another level.
/// - Returns an error when the logger backend fails to start.
pub fn init_logging(level: &str) -> Result<(), String> {
    let normalized = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.level != normalized {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                state.level, normalized
            ));
        }
        return Ok(());
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_str(normalized)
            .map_err(|err| format!("invalid log level `{normalized}`: {err}"))?
            .log_to_stderr()
            .write_mode(WriteMode::Direct)
            .format(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        info!(
            "event=logging_init module=logging status=ok level={} version={}",
            normalized,
            env!("CARGO_PKG_VERSION")
        );

        Ok(LoggingState {
            level: normalized,
            _logger: logger,
        })
    })?;

    if state.level != normalized {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, normalized
        ));
    }
    Ok(())
}

/// Returns the active level, if logging has been started.
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    let lowered = level.trim().to_ascii_lowercase();
    if lowered.is_empty() {
        return Ok(default_log_level());
    }
    SUPPORTED_LEVELS
        .iter()
        .copied()
        .find(|candidate| *candidate == lowered)
        .ok_or_else(|| format!("unsupported log level `{level}`"))
}
