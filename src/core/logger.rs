//! Main logger implementation
//!
//! A [`Logger`] owns the record queue and, while running, one consumer
//! thread plus one flush timer. Producers call [`Logger::log`] from any
//! thread; the consumer writes queued records every flush interval, or
//! right away when an error record arrives.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    flush::FlushEngine,
    metrics::LoggerMetrics,
    queue::LogQueue,
    record::RecordFormatter,
    scheduler::{ConsumerState, FlushTimer, WakeEvent},
    severity::Severity,
    sink::Sink,
    worker::Worker,
};
use crate::sinks::{ConsoleSink, FileSink};
use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Resources that exist only between `initialize()` and `shutdown()`
struct Running {
    timer: FlushTimer,
    worker: Worker,
    wake: Sender<WakeEvent>,
    log_file: Option<PathBuf>,
}

pub struct Logger {
    config: RwLock<LoggerConfig>,
    queue: Arc<LogQueue>,
    /// Wake channel for error records; `None` while not running
    waker: RwLock<Option<Sender<WakeEvent>>>,
    running: Mutex<Option<Running>>,
    /// Consumer that outlived a shutdown timeout; joined before the next run
    detached: Mutex<Option<Worker>>,
    /// Custom sinks parked here while the logger is not running
    custom_sinks: Mutex<Vec<Box<dyn Sink>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a stopped logger. Records logged before `initialize()` are
    /// queued and written by the first flush.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config: RwLock::new(config),
            queue: Arc::new(LogQueue::new()),
            waker: RwLock::new(None),
            running: Mutex::new(None),
            detached: Mutex::new(None),
            custom_sinks: Mutex::new(Vec::new()),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// The process-wide instance, created with the default configuration on
    /// first access. Use [`configure`](Self::configure) before initializing it.
    pub fn global() -> &'static Logger {
        GLOBAL.get_or_init(Logger::default)
    }

    /// Replace the configuration. Only allowed while not running.
    pub fn configure(&self, config: LoggerConfig) -> Result<()> {
        config.validate()?;
        let running = self.running.lock();
        if running.is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }
        *self.config.write() = config;
        Ok(())
    }

    /// Register an extra sink. Only allowed while not running.
    pub fn add_sink(&self, sink: Box<dyn Sink>) -> Result<()> {
        let running = self.running.lock();
        if running.is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }
        self.custom_sinks.lock().push(sink);
        Ok(())
    }

    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    /// Open the file sink, start the consumer, then start the flush timer.
    ///
    /// On failure everything acquired by this call is released again and
    /// the logger stays stopped, so the call can be retried. Fails with
    /// `ConsumerStillRunning` while a consumer from a timed-out shutdown has
    /// not exited yet.
    pub fn initialize(&self) -> Result<()> {
        let mut running = self.running.lock();
        if running.is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }
        self.reap_detached()?;

        let config = self.config.read().clone();
        config.validate()?;

        let mut engine = FlushEngine::new(Arc::clone(&self.queue), Arc::clone(&self.metrics));
        let mut log_file = None;

        if config.log_to_file {
            let sink = FileSink::create_in(&config.log_dir, &Local::now())?;
            log_file = Some(sink.path().to_path_buf());
            engine = engine.with_sink(Box::new(sink));
        }
        if config.log_to_console {
            engine = engine.with_sink(Box::new(ConsoleSink::with_colors(config.use_colors)));
        }
        engine = engine.with_custom_sinks(std::mem::take(&mut *self.custom_sinks.lock()));

        let (wake_tx, wake_rx) = unbounded();
        let worker = Worker::spawn(engine, wake_rx, config.final_flush_on_shutdown).map_err(|e| {
            eprintln!("[LOGGER ERROR] Consumer thread not started, custom sinks released: {}", e);
            e
        })?;

        let timer = match FlushTimer::start(config.flush_interval(), wake_tx.clone()) {
            Ok(timer) => timer,
            Err(e) => {
                self.stop_worker(worker, wake_tx, config.shutdown_timeout());
                return Err(e);
            }
        };

        *self.waker.write() = Some(wake_tx.clone());
        *running = Some(Running {
            timer,
            worker,
            wake: wake_tx,
            log_file,
        });
        Ok(())
    }

    /// Stop the timer, signal the consumer and wait for it to exit.
    ///
    /// With `final_flush_on_shutdown` every record logged before this call
    /// is written before it returns. If the consumer does not exit within
    /// the configured timeout it is detached and `ShutdownTimeout` returned.
    pub fn shutdown(&self) -> Result<()> {
        let mut guard = self.running.lock();
        let Running {
            timer,
            worker,
            wake,
            log_file: _,
        } = guard.take().ok_or(LoggerError::NotRunning)?;
        self.waker.write().take();

        let timeout = self.config.read().shutdown_timeout();
        let mut first_error = None;

        if let Err(e) = timer.cancel() {
            eprintln!("[LOGGER ERROR] {}", e);
            first_error = Some(e);
        }

        if wake.send(WakeEvent::Stop).is_err() {
            let e = LoggerError::SignalFailed("consumer is no longer receiving".to_string());
            eprintln!("[LOGGER ERROR] {}", e);
            first_error.get_or_insert(e);
        }
        drop(wake);

        if let Err(e) = self.join_worker(worker, timeout) {
            eprintln!("[LOGGER WARNING] {}. Queued records may be lost.", e);
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Undo a partially completed `initialize()`
    fn stop_worker(&self, worker: Worker, wake: Sender<WakeEvent>, timeout: Duration) {
        let _ = wake.send(WakeEvent::Stop);
        drop(wake);
        if let Err(e) = self.join_worker(worker, timeout) {
            eprintln!("[LOGGER ERROR] Failed to release consumer thread: {}", e);
        }
    }

    /// Join the consumer and take back its custom sinks. A consumer that
    /// misses the timeout is parked in `detached`.
    fn join_worker(&self, mut worker: Worker, timeout: Duration) -> Result<()> {
        match worker.join(timeout) {
            Ok(engine) => {
                self.custom_sinks.lock().extend(engine.into_custom_sinks());
                Ok(())
            }
            Err(e @ LoggerError::ShutdownTimeout(_)) => {
                *self.detached.lock() = Some(worker);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Join a consumer left over from a timed-out shutdown, if it has exited
    fn reap_detached(&self) -> Result<()> {
        let mut detached = self.detached.lock();
        let Some(worker) = detached.as_mut() else {
            return Ok(());
        };
        if !worker.is_finished() {
            return Err(LoggerError::ConsumerStillRunning);
        }

        let result = worker.join(Duration::ZERO);
        *detached = None;
        match result {
            Ok(engine) => self.custom_sinks.lock().extend(engine.into_custom_sinks()),
            // Its sinks are gone with it; the next run starts without them
            Err(e) => eprintln!("[LOGGER ERROR] Previous consumer failed: {}", e),
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Consumer state, or `None` while not running
    pub fn consumer_state(&self) -> Option<ConsumerState> {
        self.running.lock().as_ref().map(|r| r.worker.state())
    }

    /// Path of the file sink opened by the current run
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.running.lock().as_ref().and_then(|r| r.log_file.clone())
    }

    /// Records queued and not yet drained
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Format and enqueue a record. Never fails and never blocks beyond the
    /// queue's critical section; an error record also wakes the consumer.
    ///
    /// # Example
    ///
    /// ```
    /// use dm_logger::{Logger, LoggerConfig, Severity};
    ///
    /// let logger = Logger::new(LoggerConfig::default());
    /// logger.log(Severity::Warning, format_args!("disk at {}%", 90));
    /// assert_eq!(logger.pending(), 1);
    /// ```
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let formatter = RecordFormatter::new(self.config.read().max_record_len);

        match formatter.format(severity, args) {
            Ok((record, truncated)) => {
                if truncated {
                    self.metrics.record_truncated();
                }
                self.metrics.record_enqueued();
                self.queue.push(record);
            }
            Err(e) => {
                self.metrics.record_dropped();
                eprintln!("[LOGGER ERROR] Dropping log record: {}", e);
                return;
            }
        }

        if severity.wakes_consumer() {
            if let Some(ref wake) = *self.waker.read() {
                if wake.send(WakeEvent::ImmediateFlush).is_ok() {
                    self.metrics.record_immediate_wake();
                }
            }
        }
    }

    /// Ask the consumer for a flush without waiting for the next tick
    pub fn request_flush(&self) -> Result<()> {
        match *self.waker.read() {
            Some(ref wake) => wake.send(WakeEvent::ImmediateFlush).map_err(|_| {
                LoggerError::SignalFailed("consumer is no longer receiving".to_string())
            }),
            None => Err(LoggerError::NotRunning),
        }
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, format_args!("{}", message));
    }

    #[inline]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Severity::Warning, format_args!("{}", message));
    }

    #[inline]
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Severity::Trace, format_args!("{}", message));
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, format_args!("{}", message));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.running.get_mut().is_none() {
            return;
        }
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Shutdown during drop failed: {}", e);
        }
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use dm_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .log_to_console(false)
///     .flush_interval(Duration::from_millis(200))
///     .sink(MemorySink::new())
///     .build();
/// assert!(!logger.is_running());
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: Vec<Box<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sinks: Vec::new(),
        }
    }

    /// Start from a complete configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_to_file(mut self, enabled: bool) -> Self {
        self.config.log_to_file = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_to_console(mut self, enabled: bool) -> Self {
        self.config.log_to_console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.log_dir = dir.as_ref().to_path_buf();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval_ms = interval.as_millis() as u64;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_record_len(mut self, len: usize) -> Self {
        self.config.max_record_len = len;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn final_flush_on_shutdown(mut self, enabled: bool) -> Self {
        self.config.final_flush_on_shutdown = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn use_colors(mut self, enabled: bool) -> Self {
        self.config.use_colors = enabled;
        self
    }

    /// Add a custom sink, written after the file and console sinks
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Build a stopped logger; configuration is validated by `initialize()`
    pub fn build(self) -> Logger {
        let logger = Logger::new(self.config);
        logger.custom_sinks.lock().extend(self.sinks);
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    fn quiet_builder(memory: &MemorySink) -> LoggerBuilder {
        Logger::builder()
            .log_to_console(false)
            .flush_interval(Duration::from_millis(50))
            .sink(memory.clone())
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();
        let config = logger.config();
        assert!(config.log_to_console);
        assert!(!config.log_to_file);
        assert!(!logger.is_running());
        assert_eq!(logger.consumer_state(), None);
    }

    #[test]
    fn test_initialize_and_shutdown() {
        let memory = MemorySink::new();
        let logger = quiet_builder(&memory).build();

        logger.initialize().unwrap();
        assert!(logger.is_running());
        assert!(logger.consumer_state().is_some());

        logger.info("hello");
        logger.shutdown().unwrap();

        assert!(!logger.is_running());
        assert_eq!(memory.lines(), vec!["<DM_LOG_INFO>    :hello"]);
    }

    #[test]
    fn test_double_initialize_rejected() {
        let memory = MemorySink::new();
        let logger = quiet_builder(&memory).build();

        logger.initialize().unwrap();
        assert!(matches!(logger.initialize(), Err(LoggerError::AlreadyInitialized)));
        logger.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_when_stopped() {
        let logger = Logger::builder().log_to_console(false).build();
        assert!(matches!(logger.shutdown(), Err(LoggerError::NotRunning)));
    }

    #[test]
    fn test_configure_while_running_rejected() {
        let memory = MemorySink::new();
        let logger = quiet_builder(&memory).build();
        logger.initialize().unwrap();

        let result = logger.configure(LoggerConfig::default());
        assert!(matches!(result, Err(LoggerError::AlreadyInitialized)));
        assert!(matches!(
            logger.add_sink(Box::new(MemorySink::new())),
            Err(LoggerError::AlreadyInitialized)
        ));

        logger.shutdown().unwrap();
        assert!(logger.configure(LoggerConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_config_fails_initialize() {
        let logger = Logger::builder()
            .log_to_console(false)
            .flush_interval(Duration::ZERO)
            .build();
        assert!(matches!(
            logger.initialize(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(!logger.is_running());
    }

    #[test]
    fn test_custom_sinks_survive_restart() {
        let memory = MemorySink::new();
        let logger = quiet_builder(&memory).build();

        logger.initialize().unwrap();
        logger.info("first run");
        logger.shutdown().unwrap();

        logger.initialize().unwrap();
        logger.info("second run");
        logger.shutdown().unwrap();

        assert_eq!(
            memory.lines(),
            vec!["<DM_LOG_INFO>    :first run", "<DM_LOG_INFO>    :second run"]
        );
    }

    #[test]
    fn test_records_before_initialize_are_kept() {
        let memory = MemorySink::new();
        let logger = quiet_builder(&memory).build();

        logger.trace("early");
        assert_eq!(logger.pending(), 1);

        logger.initialize().unwrap();
        logger.shutdown().unwrap();
        assert_eq!(memory.lines(), vec!["<DM_LOG_TRACE>   :early"]);
    }

    #[test]
    fn test_request_flush() {
        let memory = MemorySink::new();
        let logger = quiet_builder(&memory)
            .flush_interval(Duration::from_secs(60))
            .build();
        assert!(matches!(logger.request_flush(), Err(LoggerError::NotRunning)));

        logger.initialize().unwrap();
        logger.info("on demand");
        logger.request_flush().unwrap();
        assert!(memory.wait_for_len(1, Duration::from_secs(2)));
        logger.shutdown().unwrap();
    }

    #[test]
    fn test_drop_shuts_down() {
        let memory = MemorySink::new();
        {
            let logger = quiet_builder(&memory)
                .flush_interval(Duration::from_secs(60))
                .build();
            logger.initialize().unwrap();
            logger.warning("flushed on drop");
        }
        assert_eq!(memory.lines(), vec!["<DM_LOG_WARNING> :flushed on drop"]);
    }

    #[test]
    fn test_formatting_failure_is_dropped() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let logger = Logger::builder().log_to_console(false).build();
        logger.log(Severity::Info, format_args!("{}", Broken));
        assert_eq!(logger.pending(), 0);
        assert_eq!(logger.metrics().records_dropped(), 1);
    }
}
