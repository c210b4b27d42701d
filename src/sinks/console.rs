//! Console sink implementation

use crate::core::{LogRecord, LoggerError, Result, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

pub struct ConsoleSink {
    out: Box<dyn Write + Send>,
    use_colors: bool,
}

impl ConsoleSink {
    /// Console sink writing to standard output
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self::new().colored(use_colors)
    }

    /// Console sink writing to an arbitrary stream
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            use_colors: false,
        }
    }

    /// Colour the severity tag. Has no effect without the `console` feature.
    #[must_use]
    pub fn colored(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[cfg(feature = "console")]
    fn render(&self, record: &LogRecord) -> String {
        if self.use_colors {
            let severity = record.severity();
            format!("{}{}", severity.tag().color(severity.color_code()), record.text())
        } else {
            record.line()
        }
    }

    #[cfg(not(feature = "console"))]
    fn render(&self, record: &LogRecord) -> String {
        record.line()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_record(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.render(record);
        writeln!(self.out, "{}", line)
            .map_err(|e| LoggerError::io_operation("writing to console", "cannot write record", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_lines() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::with_writer(Box::new(buf.clone()));

        sink.write_record(&LogRecord::new(Severity::Info, "started")).unwrap();
        sink.write_record(&LogRecord::new(Severity::Error, "disk full")).unwrap();
        sink.flush().unwrap();

        let out = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(out, "<DM_LOG_INFO>    :started\n<DM_LOG_ERROR>   :disk full\n");
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_colored_keeps_text() {
        colored::control::set_override(true);
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::with_writer(Box::new(buf.clone())).colored(true);

        sink.write_record(&LogRecord::new(Severity::Warning, "hot")).unwrap();

        let out = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert!(out.contains("<DM_LOG_WARNING> :"));
        assert!(out.ends_with("hot\n"));
        assert!(out.contains('\u{1b}'));
    }
}
