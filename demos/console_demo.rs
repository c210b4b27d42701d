//! Console logging demo
//!
//! Logs a few records; the error record is flushed immediately, the rest
//! follow on the periodic tick or at shutdown.
//!
//! Run with: cargo run --example console_demo

use dm_logger::prelude::*;
use dm_logger::{error, info, trace, warning};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== DM Logger - Console Demo ===\n");

    let logger = Logger::builder()
        .log_to_console(true)
        .flush_interval(Duration::from_millis(1000))
        .use_colors(true)
        .build();
    logger.initialize()?;

    info!(logger, "started");
    warning!(logger, "disk at {}%", 90);
    trace!(logger, "checking mount points");
    error!(logger, "disk full");

    // Give the consumer a moment to handle the immediate flush
    thread::sleep(Duration::from_millis(100));

    for i in 1..=3 {
        info!(logger, "Processing item {}/3", i);
    }

    logger.shutdown()?;

    let metrics = logger.metrics();
    println!(
        "\nWritten: {}, flushes: {}, immediate wakes: {}",
        metrics.records_written(),
        metrics.flushes(),
        metrics.immediate_wakes()
    );
    Ok(())
}
