//! Log records and the message formatter

use super::error::{LoggerError, Result};
use super::severity::Severity;
use std::fmt;

/// Default maximum length, in bytes, of a record's rendered text
pub const DEFAULT_MAX_RECORD_LEN: usize = 1024;

/// Smallest accepted maximum; leaves room for the truncation marker
pub const MIN_MAX_RECORD_LEN: usize = 32;

/// Appended to text cut at the maximum length
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// One formatted log entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    severity: Severity,
    text: String,
}

impl LogRecord {
    /// Build a record from already rendered text.
    ///
    /// The text is stored as given; use [`RecordFormatter`] to get escaping
    /// and length limits.
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The output line, `<severity-tag><text>`, without separator
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.severity.tag())?;
        f.write_str(&self.text)
    }
}

/// Renders format arguments into records with a bounded, growable buffer.
#[derive(Debug, Clone, Copy)]
pub struct RecordFormatter {
    max_len: usize,
}

impl RecordFormatter {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(MIN_MAX_RECORD_LEN),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Render `args` into a new record.
    ///
    /// Line breaks and tabs are escaped so a record always occupies a single
    /// output line. Text longer than the maximum is cut on a character
    /// boundary and ends with [`TRUNCATION_MARKER`]; the second tuple field
    /// reports whether that happened.
    pub fn format(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
    ) -> Result<(LogRecord, bool)> {
        let mut writer = BoundedWriter::with_limit(self.max_len)?;
        fmt::write(&mut writer, args).map_err(|_| {
            LoggerError::formatter("a formatting trait implementation returned an error")
        })?;

        let truncated = writer.truncated;
        let text = writer.finish();
        Ok((LogRecord { severity, text }, truncated))
    }
}

impl Default for RecordFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORD_LEN)
    }
}

struct BoundedWriter {
    buf: String,
    limit: usize,
    truncated: bool,
}

impl BoundedWriter {
    fn with_limit(limit: usize) -> Result<Self> {
        let mut buf = String::new();
        buf.try_reserve(limit.min(256))
            .map_err(|e| LoggerError::formatter(format!("cannot allocate record buffer: {}", e)))?;
        Ok(Self {
            buf,
            limit,
            truncated: false,
        })
    }

    fn push_piece(&mut self, piece: &str) {
        if self.buf.len() + piece.len() > self.limit {
            self.truncated = true;
        } else {
            self.buf.push_str(piece);
        }
    }

    fn finish(mut self) -> String {
        if self.truncated {
            let mut cut = self.limit.saturating_sub(TRUNCATION_MARKER.len()).min(self.buf.len());
            while !self.buf.is_char_boundary(cut) {
                cut -= 1;
            }
            self.buf.truncate(cut);
            self.buf.push_str(TRUNCATION_MARKER);
        }
        self.buf
    }
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Input past the limit is discarded; fmt::write must still see Ok
        for ch in s.chars() {
            if self.truncated {
                break;
            }
            match ch {
                '\n' => self.push_piece("\\n"),
                '\r' => self.push_piece("\\r"),
                '\t' => self.push_piece("\\t"),
                _ => {
                    let mut tmp = [0u8; 4];
                    self.push_piece(ch.encode_utf8(&mut tmp));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_tag() {
        let formatter = RecordFormatter::default();
        let (record, truncated) = formatter
            .format(Severity::Warning, format_args!("disk at {}%", 90))
            .unwrap();

        assert!(!truncated);
        assert_eq!(record.text(), "disk at 90%");
        assert_eq!(record.line(), "<DM_LOG_WARNING> :disk at 90%");
    }

    #[test]
    fn test_newlines_escaped() {
        let formatter = RecordFormatter::default();
        let (record, _) = formatter
            .format(Severity::Info, format_args!("a\nb\r\tc"))
            .unwrap();
        assert_eq!(record.text(), "a\\nb\\r\\tc");
    }

    #[test]
    fn test_truncation_marker() {
        let formatter = RecordFormatter::new(64);
        let long = "x".repeat(500);
        let (record, truncated) = formatter
            .format(Severity::Trace, format_args!("{}", long))
            .unwrap();

        assert!(truncated);
        assert_eq!(record.text().len(), 64);
        assert!(record.text().ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let formatter = RecordFormatter::new(MIN_MAX_RECORD_LEN);
        let long = "é".repeat(100);
        let (record, truncated) = formatter
            .format(Severity::Info, format_args!("{}", long))
            .unwrap();

        assert!(truncated);
        assert!(record.text().len() <= MIN_MAX_RECORD_LEN);
        assert!(record.text().ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_exact_fit_not_truncated() {
        let formatter = RecordFormatter::new(40);
        let exact = "y".repeat(40);
        let (record, truncated) = formatter
            .format(Severity::Info, format_args!("{}", exact))
            .unwrap();
        assert!(!truncated);
        assert_eq!(record.text(), exact);
    }

    #[test]
    fn test_minimum_enforced() {
        assert_eq!(RecordFormatter::new(1).max_len(), MIN_MAX_RECORD_LEN);
    }

    #[test]
    fn test_failing_display_is_an_error() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let formatter = RecordFormatter::default();
        let result = formatter.format(Severity::Error, format_args!("{}", Broken));
        assert!(matches!(result, Err(LoggerError::FormatterError(_))));
    }
}
