//! Sink implementations

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleSink;
pub use file::{log_file_name, FileSink};
pub use memory::MemorySink;

// Re-export the trait for convenience
pub use crate::core::Sink;
