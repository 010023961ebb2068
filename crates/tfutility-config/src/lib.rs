//! Layered configuration for the tfutility toolchain.
//!
//! Values resolve from built-in defaults, then a TOML configuration file
//! (`--config-path` or `TFUTILITY_CONFIG_PATH`), then `TFUTILITY_*`
//! environment variables, then command-line flags. Later layers win.

mod defaults;
mod logging;

use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::OrthoConfig;

/// Resolved configuration shared by the tfutility binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "TFUTILITY")]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` expression applied to log output.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
