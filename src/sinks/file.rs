//! File sink implementation

use crate::core::{LogRecord, LoggerError, Result, Sink};
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the log file created at `at`: `<month>-<day>-<year>_<hour>-<min>-<sec>.txt`
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use dm_logger::sinks::file::log_file_name;
///
/// let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
/// assert_eq!(log_file_name(&at), "3-7-2024_9-5-2.txt");
/// ```
pub fn log_file_name(at: &DateTime<Local>) -> String {
    at.format("%-m-%-d-%Y_%-H-%-M-%-S.txt").to_string()
}

pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    /// Open (or create) `path` in append mode
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_sink_open(path.display().to_string(), e))?;

        #[cfg(feature = "file")]
        {
            use fs2::FileExt;
            if let Err(e) = file.try_lock_exclusive() {
                eprintln!(
                    "[LOGGER WARNING] Could not lock log file '{}': {}",
                    path.display(),
                    e
                );
            }
        }

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Create the timestamp-named log file for `at` inside `dir`
    pub fn create_in(dir: impl AsRef<Path>, at: &DateTime<Local>) -> Result<Self> {
        Self::open(dir.as_ref().join(log_file_name(at)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

}

impl Sink for FileSink {
    fn write_record(&mut self, record: &LogRecord) -> Result<()> {
        writeln!(self.writer, "{}", record)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| {
            LoggerError::io_operation("flushing log file", self.path.display().to_string(), e)
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
