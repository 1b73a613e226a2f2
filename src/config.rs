//! Configuration
//!
//! - `DocumentOptions`: per document type, fixed at declaration time
//! - `LoggingConfig`: process-wide logger settings

use serde::Deserialize;

use crate::observability::{Logger, Severity};

/// Options a document type is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Whether documents expose attribute-style access.
    pub use_dot_notation: bool,
}

impl DocumentOptions {
    /// Options with dot notation enabled.
    pub fn dot_notation() -> Self {
        Self {
            use_dot_notation: true,
        }
    }

    /// Check if dot notation is enabled.
    pub fn is_dot_notation(&self) -> bool {
        self.use_dot_notation
    }
}

/// Logger configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Events below this severity are dropped.
    pub min_severity: Severity,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::Warn,
        }
    }
}

impl LoggingConfig {
    /// Config that emits every event.
    pub fn verbose() -> Self {
        Self {
            min_severity: Severity::Trace,
        }
    }

    /// Installs this config process-wide.
    pub fn apply(&self) {
        Logger::set_min_severity(self.min_severity);
    }
}
