//! Error types for the logger system

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The log file could not be created or opened
    #[error("Failed to open log file '{path}': {source}")]
    FileSinkOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The consumer thread could not be spawned
    #[error("Failed to start logger consumer thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The flush timer could not be created or started
    #[error("Failed to start flush timer: {message}")]
    TimerStart { message: String },

    /// The flush timer could not be stopped cleanly
    #[error("Failed to stop flush timer: {message}")]
    TimerStop { message: String },

    /// A wake-up could not be delivered to the consumer
    #[error("Failed to signal logger consumer: {0}")]
    SignalFailed(String),

    /// `initialize` called on a logger that is already running
    #[error("Logger already initialized")]
    AlreadyInitialized,

    /// Operation requires a running logger
    #[error("Logger is not running")]
    NotRunning,

    /// The consumer did not terminate within the shutdown timeout
    #[error("Logger consumer did not terminate within {0:?}")]
    ShutdownTimeout(Duration),

    /// A consumer left behind by a timed-out shutdown is still running
    #[error("Previous logger consumer is still running")]
    ConsumerStillRunning,

    /// The consumer thread panicked
    #[error("Logger consumer thread panicked: {0}")]
    WorkerPanicked(String),

    /// Formatter error
    #[error("Formatter error: {0}")]
    FormatterError(String),

    /// Sink error with sink name
    #[error("Sink '{sink}' error: {message}")]
    SinkError { sink: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink open error
    pub fn file_sink_open(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::FileSinkOpen {
            path: path.into(),
            source,
        }
    }

    pub fn timer_start(message: impl Into<String>) -> Self {
        LoggerError::TimerStart {
            message: message.into(),
        }
    }

    pub fn timer_stop(message: impl Into<String>) -> Self {
        LoggerError::TimerStop {
            message: message.into(),
        }
    }

    pub fn formatter(message: impl Into<String>) -> Self {
        LoggerError::FormatterError(message.into())
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkError {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Render a panic payload caught from a worker or sink
    pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
        if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("LoggerConfig", "flush interval must be positive");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LoggerError::file_sink_open("/var/log/app.txt", io_err);
        assert!(matches!(err, LoggerError::FileSinkOpen { .. }));

        let err = LoggerError::sink("file", "writer not initialized");
        assert!(matches!(err, LoggerError::SinkError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("LoggerConfig", "bad interval");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerConfig: bad interval"
        );

        let err = LoggerError::ShutdownTimeout(Duration::from_millis(250));
        assert_eq!(
            err.to_string(),
            "Logger consumer did not terminate within 250ms"
        );

        let err = LoggerError::sink("console", "broken pipe");
        assert_eq!(err.to_string(), "Sink 'console' error: broken pipe");

        assert_eq!(
            LoggerError::ConsumerStillRunning.to_string(),
            "Previous logger consumer is still running"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(LoggerError::panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(LoggerError::panic_message(payload.as_ref()), "owned boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7u32);
        assert_eq!(LoggerError::panic_message(payload.as_ref()), "Unknown panic");
    }
}
