//! Flush scheduling: wake-up events, consumer states and the periodic timer
//!
//! The consumer blocks on a channel of [`WakeEvent`]s. The [`FlushTimer`]
//! feeds it `Tick`s at a fixed period, error records add `ImmediateFlush`,
//! and shutdown sends `Stop`.

use super::error::{LoggerError, Result};
use crossbeam_channel::{bounded, select, tick, Sender};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeEvent {
    /// Periodic flush requested by the timer
    Tick,
    /// Early flush requested by an error record
    ImmediateFlush,
    /// Terminate the consumer
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConsumerState {
    Waiting = 0,
    Flushing = 1,
    Terminated = 2,
}

impl ConsumerState {
    /// State reached when `event` is delivered in this state.
    ///
    /// Only `Waiting` reacts to events: a running flush is never
    /// interrupted, and `Terminated` is final.
    pub fn on_wake(self, event: WakeEvent) -> ConsumerState {
        match (self, event) {
            (ConsumerState::Waiting, WakeEvent::Tick | WakeEvent::ImmediateFlush) => {
                ConsumerState::Flushing
            }
            (ConsumerState::Waiting, WakeEvent::Stop) => ConsumerState::Terminated,
            (state, _) => state,
        }
    }

    /// State reached when a flush finishes
    pub fn on_flush_complete(self) -> ConsumerState {
        match self {
            ConsumerState::Flushing => ConsumerState::Waiting,
            state => state,
        }
    }

    fn from_u8(value: u8) -> ConsumerState {
        match value {
            0 => ConsumerState::Waiting,
            1 => ConsumerState::Flushing,
            _ => ConsumerState::Terminated,
        }
    }
}

/// Consumer state shared between the consumer thread and observers
#[derive(Debug, Clone)]
pub struct StateCell(Arc<AtomicU8>);

impl StateCell {
    pub fn new(state: ConsumerState) -> Self {
        Self(Arc::new(AtomicU8::new(state as u8)))
    }

    pub fn get(&self) -> ConsumerState {
        ConsumerState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, state: ConsumerState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Repeating timer that sends [`WakeEvent::Tick`] every `period`.
///
/// At most one exists per running logger. After [`cancel`](Self::cancel)
/// returns no further tick is delivered.
pub struct FlushTimer {
    cancel: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FlushTimer {
    pub fn start(period: Duration, wake: Sender<WakeEvent>) -> Result<Self> {
        if period.is_zero() {
            return Err(LoggerError::timer_start("flush period must be greater than zero"));
        }

        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        let handle = thread::Builder::new()
            .name("dm-log-timer".to_string())
            .spawn(move || {
                let ticker = tick(period);
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            // Consumer gone, nothing left to wake
                            if wake.send(WakeEvent::Tick).is_err() {
                                break;
                            }
                        }
                        // Any message or a dropped sender cancels
                        recv(cancel_rx) -> _ => break,
                    }
                }
            })
            .map_err(|e| LoggerError::timer_start(e.to_string()))?;

        Ok(Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        })
    }

    /// Stop the timer and wait for its thread to exit
    pub fn cancel(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        drop(self.cancel.take());
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|e| LoggerError::timer_stop(LoggerError::panic_message(e.as_ref()))),
            None => Ok(()),
        }
    }
}

impl Drop for FlushTimer {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            eprintln!("[LOGGER ERROR] {}", e);
        }
    }
}
