//! Structured logging with tracing
//!
//! Installs a fmt subscriber on stderr. `TCC_LOG` takes precedence over the
//! level passed in, using the usual `EnvFilter` directive syntax.

use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{CompileError, Result};

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "TCC_LOG";

/// Initialize logging at `level` unless `TCC_LOG` says otherwise
pub fn init_logging(level: &str) -> Result<()> {
    let level = parse_log_level(level)?;
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .try_init()
        .map_err(|e| CompileError::Config(format!("Failed to initialize logging: {e}")))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(CompileError::Config(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}
