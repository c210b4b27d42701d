//! File logging demo
//!
//! Writes records to a timestamp-named file in the current directory and
//! mirrors them on the console.
//!
//! Run with: cargo run --example file_demo

use dm_logger::prelude::*;
use dm_logger::{error, info, warning};

fn main() -> Result<()> {
    println!("=== DM Logger - File Demo ===\n");

    let config = LoggerConfig::from_json(
        r#"{ "log_to_file": true, "log_to_console": true, "flush_interval_ms": 500 }"#,
    )?;
    let logger = Logger::builder().config(config).build();
    logger.initialize()?;

    let path = logger.log_file_path();

    info!(logger, "Application started");
    info!(logger, "Connecting to database...");
    warning!(logger, "Using default settings for some options");
    error!(logger, "Failed to load optional plugin");
    info!(logger, "Application initialization complete");

    logger.shutdown()?;

    if let Some(path) = path {
        println!("\nCheck '{}' for the full log output", path.display());
    }
    Ok(())
}
