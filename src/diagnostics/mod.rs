//! Diagnostic reporting for model validation and evaluation.
//!
//! The engine never prints directly: every structural problem found by the
//! validator and every ill-formed condition hit at evaluation time goes
//! through a [`DiagnosticSink`]. The default sink forwards to the `tracing`
//! macros; [`MemorySink`] collects entries for assertions and for hosts that
//! want programmatic access to diagnostics.

use std::fmt;
use std::sync::Mutex;

/// Severity of a validation diagnostic.
///
/// Compilation proceeds when only warnings were emitted and aborts on the
/// first compile attempt that produced any error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding from the validator.
///
/// `element` is the fully qualified name of the offending element so the
/// message is actionable without access to the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub element: String,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", tag, self.element, self.detail)
    }
}

/// Pluggable destination for engine diagnostics.
///
/// Replace it through [`Settings::with_sink`](crate::Settings::with_sink).
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink backed by the `tracing` macros.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "statecraft", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "statecraft", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "statecraft", "{message}");
    }
}

/// Level recorded for a captured sink entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkLevel {
    Log,
    Warn,
    Error,
}

/// Sink that captures diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(SinkLevel, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: SinkLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }

    /// All captured entries in arrival order.
    pub fn entries(&self) -> Vec<(SinkLevel, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Captured messages at a single level.
    pub fn messages(&self, level: SinkLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(SinkLevel::Error)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(SinkLevel::Warn)
    }
}

impl DiagnosticSink for MemorySink {
    fn log(&self, message: &str) {
        self.push(SinkLevel::Log, message);
    }

    fn warn(&self, message: &str) {
        self.push(SinkLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(SinkLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        sink.log("first");
        sink.error("second");
        sink.warn("third");

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (SinkLevel::Log, "first".to_string()));
        assert_eq!(entries[1], (SinkLevel::Error, "second".to_string()));
        assert_eq!(entries[2], (SinkLevel::Warn, "third".to_string()));
    }

    #[test]
    fn memory_sink_filters_by_level() {
        let sink = MemorySink::new();
        sink.error("bad");
        sink.warn("iffy");
        sink.error("worse");

        assert_eq!(sink.errors(), vec!["bad".to_string(), "worse".to_string()]);
        assert_eq!(sink.warnings(), vec!["iffy".to_string()]);
    }

    #[test]
    fn diagnostic_display_includes_severity_and_element() {
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            element: "machine.region".to_string(),
            detail: "region has no initial vertex".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "error: machine.region: region has no initial vertex"
        );
    }
}
