//! Conformance suites for the booking REST API.
//!
//! The hermetic suites under `tests/` run against a local stub. The `live_*`
//! suites need the `live-api` feature and a configured environment:
//!
//! ```text
//! BOOKER_BASE_URL=https://restful-booker.herokuapp.com \
//! BOOKER_AUTH_URL=https://restful-booker.herokuapp.com/auth \
//! BOOKER_USERNAME=admin BOOKER_PASSWORD=password123 \
//! cargo test -p booker-conformance --features live-api
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use booker_common::{HarnessResult, TracingConfig, TracingReport, init_tracing};
use booker_harness::{HarnessConfig, Session};
use std::sync::Arc;
use tracing::debug;

/// Install the suite subscriber. Later calls in the same binary are no-ops.
pub fn init_suite_tracing(suite: &str) {
    let config = TracingConfig::default().with_service_name(suite);
    if init_tracing(&config).is_err() {
        debug!(suite, "Tracing already initialized");
    }
}

/// A session against the API named by the `BOOKER_*` environment, reporting
/// through `tracing` under `suite`.
///
/// # Errors
///
/// Returns [`booker_common::HarnessError::Config`] if a variable is missing
/// or unusable.
pub fn live_session(suite: &str) -> HarnessResult<Session> {
    init_suite_tracing(suite);
    let config = HarnessConfig::from_env()?;
    Session::new(config, Arc::new(TracingReport::new(suite)))
}
