//! Cross-cutting concerns for the booking API conformance harness.
//!
//! This crate provides centralized implementations for:
//! - The execution-layer error type
//! - HTTP client configuration and building
//! - The authorization retry policy (one retry, on 403 only)
//! - Tracing subscriber setup
//! - The report sink that test outcomes are written to

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod report;
pub mod retry;
pub mod tracing_config;

pub use error::{HarnessError, HarnessResult};
pub use http::{HttpConfig, build_http_client};
pub use report::{ReportEntry, ReportLevel, ReportSink, TracingReport};
pub use retry::{AuthRetryPolicy, RetryOutcome};
pub use tracing_config::{TracingConfig, init_tracing};
