//! Sink trait for flushed record destinations

use super::{error::Result, record::LogRecord};

/// Output destination written by the flush engine.
///
/// Sinks are owned by the consumer thread; producers never touch them.
pub trait Sink: Send {
    /// Write one record followed by a record separator
    fn write_record(&mut self, record: &LogRecord) -> Result<()>;
    /// Force buffered output down to the underlying stream
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
