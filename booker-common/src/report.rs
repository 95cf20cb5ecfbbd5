//! Report sink for test outcomes.
//!
//! Validators write every pass, failure and informational note to a
//! [`ReportSink`] before any failure propagates, so the human-readable report
//! always carries the full context of a run. [`TracingReport`] is the default
//! sink and forwards entries to `tracing`.

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Outcome class of a report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    /// A check that held
    Pass,
    /// A check that did not hold
    Fail,
    /// Context with no outcome attached
    Info,
}

impl ReportLevel {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Info => "INFO",
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Outcome class
    pub level: ReportLevel,
    /// Human-readable message
    pub message: String,
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
}

impl ReportEntry {
    /// Create a new entry stamped with the current time.
    #[must_use]
    pub fn new(level: ReportLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Destination for report entries.
///
/// Implementations must not fail: recording is fire-and-forget.
pub trait ReportSink: Send + Sync {
    /// Record one entry.
    fn record(&self, entry: ReportEntry);

    /// Record a passing check.
    fn log_pass(&self, message: &str) {
        self.record(ReportEntry::new(ReportLevel::Pass, message));
    }

    /// Record a failing check.
    fn log_fail(&self, message: &str) {
        self.record(ReportEntry::new(ReportLevel::Fail, message));
    }

    /// Record context.
    fn log_info(&self, message: &str) {
        self.record(ReportEntry::new(ReportLevel::Info, message));
    }
}

/// Sink that emits every entry as a `tracing` event.
#[derive(Debug, Clone)]
pub struct TracingReport {
    suite: String,
}

impl TracingReport {
    /// Create a sink tagging entries with the given suite name.
    #[must_use]
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
        }
    }

    /// Suite name attached to each event.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }
}

impl Default for TracingReport {
    fn default() -> Self {
        Self::new("booker-conformance")
    }
}

impl ReportSink for TracingReport {
    fn record(&self, entry: ReportEntry) {
        match entry.level {
            ReportLevel::Pass | ReportLevel::Info => info!(
                suite = %self.suite,
                outcome = entry.level.as_str(),
                at = %entry.timestamp,
                "{}",
                entry.message
            ),
            ReportLevel::Fail => error!(
                suite = %self.suite,
                outcome = entry.level.as_str(),
                at = %entry.timestamp,
                "{}",
                entry.message
            ),
        }
    }
}
