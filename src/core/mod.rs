//! Core logger types and traits

pub mod config;
pub mod error;
pub mod flush;
pub mod logger;
pub mod metrics;
pub mod queue;
pub mod record;
pub mod scheduler;
pub mod severity;
pub mod sink;
pub mod worker;

pub use config::{LoggerConfig, DEFAULT_FLUSH_INTERVAL, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use flush::FlushEngine;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use queue::LogQueue;
pub use record::{LogRecord, RecordFormatter, DEFAULT_MAX_RECORD_LEN, TRUNCATION_MARKER};
pub use scheduler::{ConsumerState, FlushTimer, WakeEvent};
pub use severity::Severity;
pub use sink::Sink;
pub use worker::Worker;
