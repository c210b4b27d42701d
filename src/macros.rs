//! Logging macros for ergonomic record formatting.
//!
//! These macros take `format!`-style arguments and hand them to
//! [`Logger::log`](crate::Logger::log) without building an intermediate
//! `String`.
//!
//! # Examples
//!
//! ```
//! use dm_logger::prelude::*;
//! use dm_logger::{info, warning};
//!
//! let logger = Logger::builder().log_to_console(false).build();
//!
//! info!(logger, "Server started");
//!
//! let usage = 90;
//! warning!(logger, "disk at {}%", usage);
//! assert_eq!(logger.pending(), 2);
//! ```

/// Log a record at the given severity.
///
/// # Examples
///
/// ```
/// # use dm_logger::prelude::*;
/// # let logger = Logger::builder().log_to_console(false).build();
/// use dm_logger::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format_args!($($arg)+))
    };
}

/// Log an error record; wakes the consumer for an immediate flush.
///
/// ```
/// # use dm_logger::prelude::*;
/// # let logger = Logger::builder().log_to_console(false).build();
/// use dm_logger::error;
/// error!(logger, "disk full");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a warning record.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log a trace record.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

/// Log an info record.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Logger, Severity};
    use crate::sinks::MemorySink;

    fn quiet() -> Logger {
        Logger::builder().log_to_console(false).build()
    }

    #[test]
    fn test_log_macro() {
        let logger = quiet();
        log!(logger, Severity::Info, "Test message");
        log!(logger, Severity::Info, "Formatted: {}", 42);
        assert_eq!(logger.pending(), 2);
    }

    #[test]
    fn test_severity_macros_render_tags() {
        let memory = MemorySink::new();
        let logger = Logger::builder()
            .log_to_console(false)
            .sink(memory.clone())
            .build();

        error!(logger, "Code: {}", 500);
        warning!(logger, "Retry {} of {}", 1, 3);
        trace!(logger, "Value: {}", 10);
        info!(logger, "Items: {}", 100);

        logger.initialize().unwrap();
        logger.shutdown().unwrap();

        assert_eq!(
            memory.lines(),
            vec![
                "<DM_LOG_ERROR>   :Code: 500",
                "<DM_LOG_WARNING> :Retry 1 of 3",
                "<DM_LOG_TRACE>   :Value: 10",
                "<DM_LOG_INFO>    :Items: 100",
            ]
        );
    }
}
