//! Logger configuration
//!
//! Fixed input consumed at `initialize()`. Every field has a default, so a
//! partial JSON document is enough.

use super::error::{LoggerError, Result};
use super::record::{DEFAULT_MAX_RECORD_LEN, MIN_MAX_RECORD_LEN};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default periodic flush interval (1 second)
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(1000);

/// Default shutdown timeout for joining the consumer (5 seconds)
///
/// Also used when a running logger is dropped without explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_to_file: bool,
    pub log_to_console: bool,
    pub flush_interval_ms: u64,
    /// Directory receiving the timestamp-named log file
    pub log_dir: PathBuf,
    pub max_record_len: usize,
    pub shutdown_timeout_ms: u64,
    /// Write out records still queued when the consumer observes `Stop`
    pub final_flush_on_shutdown: bool,
    /// Colour severity tags on the console (feature `console`)
    pub use_colors: bool,
}

impl LoggerConfig {
    /// Parse a configuration from JSON
    ///
    /// # Example
    ///
    /// ```
    /// use dm_logger::LoggerConfig;
    ///
    /// let json = r#"{ "log_to_file": true, "flush_interval_ms": 250 }"#;
    /// let config = LoggerConfig::from_json(json).unwrap();
    /// assert!(config.log_to_file);
    /// assert!(config.log_to_console);
    /// assert_eq!(config.flush_interval_ms, 250);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flush_interval_ms == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "flush_interval_ms must be greater than zero",
            ));
        }
        if self.max_record_len < MIN_MAX_RECORD_LEN {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("max_record_len must be at least {}", MIN_MAX_RECORD_LEN),
            ));
        }
        Ok(())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_to_file: false,
            log_to_console: true,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL.as_millis() as u64,
            log_dir: PathBuf::from("."),
            max_record_len: DEFAULT_MAX_RECORD_LEN,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT.as_millis() as u64,
            final_flush_on_shutdown: true,
            use_colors: false,
        }
    }
}
