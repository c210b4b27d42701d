//! Severity definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ERROR_TAG: &str = "<DM_LOG_ERROR>   :";
pub const WARNING_TAG: &str = "<DM_LOG_WARNING> :";
pub const TRACE_TAG: &str = "<DM_LOG_TRACE>   :";
pub const INFO_TAG: &str = "<DM_LOG_INFO>    :";

/// Severity attached to every record.
///
/// Severity is a tag only; it does not filter. `Error` additionally wakes
/// the consumer for an immediate flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Trace,
    #[default]
    Info,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::Trace,
        Severity::Info,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
        }
    }

    /// Fixed literal prefix written in front of the record text
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Error => ERROR_TAG,
            Severity::Warning => WARNING_TAG,
            Severity::Trace => TRACE_TAG,
            Severity::Info => INFO_TAG,
        }
    }

    /// Whether emitting a record of this severity requests an immediate flush
    #[inline]
    pub fn wakes_consumer(&self) -> bool {
        matches!(self, Severity::Error)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Error => Red,
            Severity::Warning => Yellow,
            Severity::Trace => BrightBlack,
            Severity::Info => Green,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(Severity::Error),
            "WARN" | "WARNING" => Ok(Severity::Warning),
            "TRACE" => Ok(Severity::Trace),
            "INFO" => Ok(Severity::Info),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}
