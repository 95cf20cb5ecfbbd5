//! Mock implementations for testing.
//!
//! [`RecordingReport`] keeps every report entry in memory so tests can
//! assert on what a validator logged. [`BookerStub`] serves the booking API
//! from a local wiremock server.

use booker_common::{HarnessResult, ReportEntry, ReportLevel, ReportSink};
use booker_harness::{Booking, HarnessConfig, Session};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Report sink that records entries in memory.
#[derive(Debug, Default)]
pub struct RecordingReport {
    entries: Mutex<Vec<ReportEntry>>,
}

impl RecordingReport {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty recorder behind an `Arc`, ready for a [`Session`].
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ReportEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.lock().clone()
    }

    /// Messages recorded at `level`.
    #[must_use]
    pub fn messages(&self, level: ReportLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Whether any entry at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: ReportLevel, needle: &str) -> bool {
        self.lock()
            .iter()
            .any(|entry| entry.level == level && entry.message.contains(needle))
    }

    /// Entry count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ReportSink for RecordingReport {
    fn record(&self, entry: ReportEntry) {
        self.lock().push(entry);
    }
}

/// Path the stub serves tokens on.
pub const AUTH_PATH: &str = "/auth";

/// Credentials the stub accepts.
pub const STUB_USERNAME: &str = "admin";
/// Password the stub accepts.
pub const STUB_PASSWORD: &str = "password123";

/// Wiremock server speaking the booking API.
///
/// Every `mount_*` helper registers one behavior; when several match a
/// request, the one mounted first that still has uses left answers.
pub struct BookerStub {
    server: MockServer,
}

impl BookerStub {
    /// Start a stub on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// The underlying server.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Base URL of the stub.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Harness configuration pointing at the stub.
    ///
    /// # Errors
    ///
    /// Returns an error if the stub URI is not a valid URL.
    pub fn config(&self) -> HarnessResult<HarnessConfig> {
        HarnessConfig::new(
            &self.uri(),
            &format!("{}{AUTH_PATH}", self.uri()),
            STUB_USERNAME,
            STUB_PASSWORD,
        )
    }

    /// A session against the stub.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or HTTP client cannot be built.
    pub fn session(&self, report: Arc<dyn ReportSink>) -> HarnessResult<Session> {
        Session::new(self.config()?, report)
    }

    /// Issue `token` to the accepted credentials, `expected` times in total.
    pub async fn mount_token(&self, token: &str, expected: u64) {
        Mock::given(method("POST"))
            .and(path(AUTH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    /// Issue each token once, in order.
    pub async fn mount_token_sequence(&self, tokens: &[&str]) {
        for token in tokens {
            Mock::given(method("POST"))
                .and(path(AUTH_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
                .up_to_n_times(1)
                .expect(1)
                .mount(&self.server)
                .await;
        }
    }

    /// Answer authentication the way the public API answers wrong credentials.
    pub async fn mount_bad_credentials(&self) {
        Mock::given(method("POST"))
            .and(path(AUTH_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "reason": "Bad credentials" })),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer `POST /booking` by echoing `booking` under `id`.
    pub async fn mount_create(&self, booking: &Booking, id: i64) {
        Mock::given(method("POST"))
            .and(path("/booking"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "bookingid": id, "booking": booking })),
            )
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /booking/{id}` with `booking`.
    pub async fn mount_get(&self, id: &str, booking: &Booking) {
        Mock::given(method("GET"))
            .and(path(format!("/booking/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(booking))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /booking` with the given ids.
    pub async fn mount_list(&self, ids: &[i64]) {
        let body: Vec<_> = ids.iter().map(|id| json!({ "bookingid": id })).collect();
        Mock::given(method("GET"))
            .and(path("/booking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `PUT /booking/{id}` carrying `token` by echoing `booking`.
    pub async fn mount_update(&self, id: &str, token: &str, booking: &Booking) {
        Mock::given(method("PUT"))
            .and(path(format!("/booking/{id}")))
            .and(header("cookie", format!("token={token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(booking))
            .mount(&self.server)
            .await;
    }

    /// Answer `DELETE /booking/{id}` carrying `token` once with 201, then
    /// with 405 like the public API does for an already deleted booking.
    pub async fn mount_delete(&self, id: &str, token: &str) {
        let cookie = format!("token={token}");
        Mock::given(method("DELETE"))
            .and(path(format!("/booking/{id}")))
            .and(header("cookie", cookie.as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/booking/{id}")))
            .and(header("cookie", cookie.as_str()))
            .respond_with(ResponseTemplate::new(405).set_body_string("Method Not Allowed"))
            .mount(&self.server)
            .await;
    }

    /// Deny the next `times` requests of `verb` to `route` with 403.
    pub async fn mount_forbidden(&self, verb: &str, route: &str, times: u64) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Answer `verb` to `route` with `status` and a plain-text body.
    pub async fn mount_status(&self, verb: &str, route: &str, status: u16, body: &str) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received with `verb` on `route`.
    pub async fn requests_to(&self, verb: &str, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.method.as_str() == verb && request.url.path() == route)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_report() {
        let report = RecordingReport::new();
        report.log_pass("PASS: status");
        report.log_fail("FAIL: name");
        report.log_info("ASSERTION FAILURE: name");

        assert_eq!(report.count(), 3);
        assert_eq!(report.messages(ReportLevel::Fail), ["FAIL: name"]);
        assert!(report.contains(ReportLevel::Info, "ASSERTION FAILURE"));
        assert!(!report.contains(ReportLevel::Pass, "name"));

        report.clear();
        assert_eq!(report.count(), 0);
    }

    #[tokio::test]
    async fn test_stub_counts_requests() {
        let stub = BookerStub::start().await;
        stub.mount_list(&[1, 2]).await;
        let session = stub.session(RecordingReport::shared()).unwrap();

        session.list_booking_ids(true).await.unwrap();
        session.list_booking_ids(false).await.unwrap();

        assert_eq!(stub.requests_to("GET", "/booking").await, 2);
        assert_eq!(stub.requests_to("POST", AUTH_PATH).await, 0);
    }
}
