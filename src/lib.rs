//! # DM Logger
//!
//! A process-local buffered logger. Application threads enqueue formatted
//! records; a dedicated consumer thread drains the queue and writes the
//! records to a file and/or the console.
//!
//! ## Features
//!
//! - **Non-blocking producers**: `log()` only formats and pushes onto a queue
//! - **Timed flushing**: the consumer flushes on a fixed interval
//! - **Immediate error flush**: an error record wakes the consumer at once
//! - **Clean lifecycle**: failed initialization releases everything it
//!   acquired, and shutdown writes out every record still queued
//!
//! ## Example
//!
//! ```no_run
//! use dm_logger::prelude::*;
//! use dm_logger::{error, info, warning};
//!
//! let logger = Logger::builder().log_to_console(true).build();
//! logger.initialize()?;
//!
//! info!(logger, "started");
//! warning!(logger, "disk at {}%", 90);
//! error!(logger, "disk full");
//!
//! logger.shutdown()?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ConsumerState, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result, Severity, Sink, DEFAULT_FLUSH_INTERVAL, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink};
}

pub use crate::core::{
    ConsumerState, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    RecordFormatter, Result, Severity, Sink, WakeEvent, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::sinks::{ConsoleSink, FileSink, MemorySink};
