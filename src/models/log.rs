//! Decision log.
//!
//! An ordered audit trail of the choices made during a run. Each entry is
//! tagged with the module path and source line that recorded it, and is
//! mirrored to `tracing` at debug level.

use serde::{Deserialize, Serialize};

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Module path of the decision point.
    pub source: String,
    /// Source line of the decision point.
    pub line: u32,
    /// Human-readable description.
    pub message: String,
}

/// Ordered list of decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionLog {
    entries: Vec<LogEntry>,
}

impl DecisionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Prefer the crate's `decision!` macro, which fills in
    /// the location tag.
    pub fn record(&mut self, source: &str, line: u32, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(source, line, "{message}");
        self.entries.push(LogEntry {
            source: source.to_string(),
            line,
            message,
        });
    }

    /// Appends every entry of another log.
    pub fn extend(&mut self, other: DecisionLog) {
        self.entries.extend(other.entries);
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry's message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }

    /// Renders entries as `source:line: message` lines.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}:{}: {}", e.source, e.line, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
