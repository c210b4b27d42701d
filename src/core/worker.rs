//! Consumer thread: waits for wake-ups and runs the flush engine

use super::{
    error::{LoggerError, Result},
    flush::FlushEngine,
    scheduler::{ConsumerState, StateCell, WakeEvent},
};
use crossbeam_channel::Receiver;
use std::thread;
use std::time::{Duration, Instant};

/// Handle to the single consumer thread of a running logger
pub struct Worker {
    handle: Option<thread::JoinHandle<FlushEngine>>,
    state: StateCell,
}

impl Worker {
    /// Spawn the consumer in the `Waiting` state.
    ///
    /// With `final_flush` set, records still queued when `Stop` is observed
    /// are written before the thread exits.
    pub fn spawn(
        engine: FlushEngine,
        wake: Receiver<WakeEvent>,
        final_flush: bool,
    ) -> Result<Self> {
        let state = StateCell::new(ConsumerState::Waiting);
        let thread_state = state.clone();

        let handle = thread::Builder::new()
            .name("dm-log-consumer".to_string())
            .spawn(move || consume(engine, wake, thread_state, final_flush))
            .map_err(LoggerError::WorkerSpawn)?;

        Ok(Self {
            handle: Some(handle),
            state,
        })
    }

    pub fn state(&self) -> ConsumerState {
        self.state.get()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Wait up to `timeout` for the consumer to exit and return its engine.
    ///
    /// On timeout the handle is kept, so the caller can retry the join once
    /// the thread has finished its current flush.
    pub fn join(&mut self, timeout: Duration) -> Result<FlushEngine> {
        let start = Instant::now();
        loop {
            if self.is_finished() {
                // Thread finished, join it to check for panics
                let handle = self.handle.take().ok_or(LoggerError::NotRunning)?;
                return handle.join().map_err(|e| {
                    LoggerError::WorkerPanicked(LoggerError::panic_message(e.as_ref()))
                });
            }

            if start.elapsed() >= timeout {
                return Err(LoggerError::ShutdownTimeout(timeout));
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(1));
        }
    }
}

fn consume(
    mut engine: FlushEngine,
    wake: Receiver<WakeEvent>,
    state: StateCell,
    final_flush: bool,
) -> FlushEngine {
    let mut current = ConsumerState::Waiting;
    state.set(current);

    while current != ConsumerState::Terminated {
        // Every sender dropped: nobody can ask for a flush or a stop anymore
        let event = wake.recv().unwrap_or(WakeEvent::Stop);

        current = current.on_wake(event);
        state.set(current);

        if current == ConsumerState::Flushing {
            engine.flush();
            current = current.on_flush_complete();
            state.set(current);
        }
    }

    if final_flush {
        engine.flush();
    }
    engine
}
