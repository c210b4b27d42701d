//! In-memory sink
//!
//! Keeps flushed lines in a shared buffer. Clones share the buffer, so one
//! clone can be handed to the logger while another is inspected.

use crate::core::{LogRecord, Result, Sink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    flushes: Arc<AtomicU64>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Number of flush calls received
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    /// Poll until at least `count` lines are present or `timeout` elapses.
    /// Returns whether the count was reached.
    pub fn wait_for_len(&self, count: usize, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.len() >= count {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(Duration::from_millis(2));
        }
    }
}

impl Sink for MemorySink {
    fn write_record(&mut self, record: &LogRecord) -> Result<()> {
        self.lines.lock().push(record.line());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
