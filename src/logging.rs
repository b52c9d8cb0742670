//! Logging configuration for the bridge
//!
//! Structured logging via `tracing`. Per-characteristic context is carried as
//! fields on the individual events (`characteristic = %name`), so a single
//! subscriber covers every coordinator in the process.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level
    pub level: Level,

    /// Log to stderr instead of stdout
    pub stderr: bool,

    /// Include timestamps
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            stderr: true,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Create config from environment
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            if rust_log.contains("trace") {
                config.level = Level::TRACE;
            } else if rust_log.contains("debug") {
                config.level = Level::DEBUG;
            } else if rust_log.contains("info") {
                config.level = Level::INFO;
            } else if rust_log.contains("warn") {
                config.level = Level::WARN;
            } else if rust_log.contains("error") {
                config.level = Level::ERROR;
            }
        }

        if let Ok(log_stderr) = std::env::var("ZWAVE_HAP_LOG_STDERR") {
            config.stderr = log_stderr.to_lowercase() != "false";
        }

        config
    }
}

/// Initialize logging with the given configuration
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_level(true)
        .with_target(true);

    match (config.stderr, config.timestamps) {
        (true, true) => builder.with_writer(std::io::stderr).try_init()?,
        (true, false) => builder
            .with_writer(std::io::stderr)
            .without_time()
            .try_init()?,
        (false, true) => builder.try_init()?,
        (false, false) => builder.without_time().try_init()?,
    }

    Ok(())
}
