//! Concurrent FIFO queue of pending records
//!
//! Every operation runs under a single mutex. Producers append from any
//! thread; only the flush engine removes records.

use super::record::LogRecord;
use parking_lot::Mutex;
use std::collections::vec_deque::Drain;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct LogQueue {
    records: Mutex<VecDeque<LogRecord>>,
}

impl LogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the tail
    pub fn push(&self, record: LogRecord) {
        self.records.lock().push_back(record);
    }

    /// Remove and return every queued record in FIFO order
    pub fn drain_all(&self) -> Vec<LogRecord> {
        let mut records = self.records.lock();
        std::mem::take(&mut *records).into()
    }

    /// Drain the queue and hand the records to `f` while the lock is held.
    ///
    /// Producers calling [`push`](Self::push) block until `f` returns.
    /// Records not consumed by `f` are dropped with the iterator.
    pub fn with_drained<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Drain<'_, LogRecord>) -> R,
    {
        let mut records = self.records.lock();
        f(records.drain(..))
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
