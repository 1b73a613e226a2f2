//! Structured JSON logger
//!
//! - One log line = one JSON object = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Events below the process-wide minimum severity are dropped

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Fine-grained lifecycle detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn from_u8(level: u8) -> Severity {
        match level {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Warn as u8);

/// A structured logger that writes JSON lines
pub struct Logger;

impl Logger {
    /// Sets the minimum severity that gets written.
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    /// Returns the current minimum severity.
    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Whether an event of `severity` would be written.
    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Log an event with the given severity and fields.
    ///
    /// Warnings and errors go to stderr, everything else to stdout.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let min = Self::min_severity();
        // Logging never fails the caller
        let _ = if severity >= Severity::Warn {
            Self::log_to_writer(min, severity, event, fields, &mut io::stderr().lock())
        } else {
            Self::log_to_writer(min, severity, event, fields, &mut io::stdout().lock())
        };
    }

    /// Writes one line to `writer` unless `severity` is below `min`.
    ///
    /// Returns whether a line was written.
    pub fn log_to_writer<W: Write>(
        min: Severity,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) -> io::Result<bool> {
        if severity < min {
            return Ok(false);
        }
        writer.write_all(format_line(severity, event, fields).as_bytes())?;
        Ok(true)
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

/// Renders one log line, newline included.
pub(crate) fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(128);

    output.push_str("{\"event\":\"");
    escape_json_string(&mut output, event);
    output.push_str("\",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push_str("}\n");
    output
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => output.push_str(&format!("\\u{:04x}", c as u32)),
            c => output.push(c),
        }
    }
}

/// Capture logs to a buffer for testing
#[cfg(test)]
pub fn capture_log(
    min: Severity,
    severity: Severity,
    event: &str,
    fields: &[(&str, &str)],
) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(min, severity, event, fields, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
