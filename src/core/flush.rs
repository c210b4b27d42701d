//! Flush engine: drains the queue and writes every record to the sinks

use super::{
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    queue::LogQueue,
    sink::Sink,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

enum SinkFault {
    Failed(LoggerError),
    Panicked(String),
}

/// Per-sink failure tally for one flush pass
#[derive(Default)]
struct FaultLog {
    first: Option<SinkFault>,
    count: usize,
}

impl FaultLog {
    fn note(&mut self, fault: SinkFault) {
        self.count += 1;
        if self.first.is_none() {
            self.first = Some(fault);
        }
    }

    fn panicked(&self) -> bool {
        matches!(self.first, Some(SinkFault::Panicked(_)))
    }
}

/// Run a sink call, isolating both errors and panics from the caller
fn isolate(call: impl FnOnce() -> Result<()>) -> std::result::Result<(), SinkFault> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(SinkFault::Failed(e)),
        Err(payload) => Err(SinkFault::Panicked(LoggerError::panic_message(payload.as_ref()))),
    }
}

/// Writes drained records to the configured sinks in FIFO order.
///
/// Owned by the consumer thread. Built-in sinks (file, console) come first,
/// followed by custom sinks registered on the logger.
pub struct FlushEngine {
    queue: Arc<LogQueue>,
    sinks: Vec<Box<dyn Sink>>,
    custom: Vec<Box<dyn Sink>>,
    metrics: Arc<LoggerMetrics>,
}

impl FlushEngine {
    pub fn new(queue: Arc<LogQueue>, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            queue,
            sinks: Vec::new(),
            custom: Vec::new(),
            metrics,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    #[must_use]
    pub fn with_custom_sinks(mut self, sinks: Vec<Box<dyn Sink>>) -> Self {
        self.custom.extend(sinks);
        self
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks
            .iter()
            .chain(self.custom.iter())
            .map(|s| s.name())
            .collect()
    }

    /// Give back the custom sinks so a later `initialize()` can reuse them
    pub fn into_custom_sinks(self) -> Vec<Box<dyn Sink>> {
        self.custom
    }

    /// Drain the queue and write every record to every sink, then flush
    /// the sinks. The queue lock is held for the whole pass.
    ///
    /// A failing sink is reported and skipped; the others are still served.
    /// Returns the number of records drained.
    pub fn flush(&mut self) -> usize {
        let FlushEngine {
            queue,
            sinks,
            custom,
            metrics,
        } = self;

        let mut faults: Vec<FaultLog> = Vec::new();
        faults.resize_with(sinks.len() + custom.len(), FaultLog::default);

        let written = queue.with_drained(|records| {
            let mut written = 0usize;
            for record in records {
                for (idx, sink) in sinks.iter_mut().chain(custom.iter_mut()).enumerate() {
                    // A panicking sink sits out the rest of this pass
                    if faults[idx].panicked() {
                        continue;
                    }
                    if let Err(fault) = isolate(|| sink.write_record(&record)) {
                        faults[idx].note(fault);
                    }
                }
                written += 1;
            }

            for (idx, sink) in sinks.iter_mut().chain(custom.iter_mut()).enumerate() {
                if faults[idx].panicked() {
                    continue;
                }
                if let Err(fault) = isolate(|| sink.flush()) {
                    faults[idx].note(fault);
                }
            }
            written
        });

        for (sink, fault) in sinks.iter().chain(custom.iter()).zip(faults) {
            match fault.first {
                None => {}
                Some(SinkFault::Failed(e)) => {
                    metrics.record_sink_failure();
                    eprintln!(
                        "[LOGGER ERROR] Sink '{}' failed {} time(s) during flush: {}",
                        sink.name(),
                        fault.count,
                        e
                    );
                }
                Some(SinkFault::Panicked(msg)) => {
                    metrics.record_sink_failure();
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked during flush: {}. \
                         Other sinks continue to function.",
                        sink.name(),
                        msg
                    );
                }
            }
        }

        metrics.record_written(written as u64);
        metrics.record_flush();
        written
    }
}
