//! Request execution with one re-authentication retry.

use crate::{
    config::HarnessConfig,
    response::RawResponse,
    token::{Authenticator, TokenCache},
};
use booker_common::{
    AuthRetryPolicy, HarnessError, HarnessResult, ReportSink, RetryOutcome, build_http_client,
};
use reqwest::{Client, Method, header};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// One request to the booking API.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedOperation {
    /// HTTP method
    pub method: Method,
    /// Resource path, e.g. `/booking/12`
    pub path: String,
    /// JSON body, if any
    pub body: Option<Value>,
    /// Whether a `Cookie: token=` header must be attached
    pub requires_auth: bool,
    /// Whether to send JSON `Content-Type`/`Accept` headers
    pub json_headers: bool,
}

impl AuthenticatedOperation {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            requires_auth: false,
            json_headers: true,
        }
    }

    /// `GET` without authentication.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    /// `POST` without authentication.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    /// Authenticated `PUT`.
    #[must_use]
    pub fn put(path: impl Into<String>, body: Option<Value>) -> Self {
        Self::new(Method::PUT, path, body).with_auth()
    }

    /// Authenticated `DELETE`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None).with_auth()
    }

    /// Require a token.
    #[must_use]
    pub const fn with_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Send without JSON content negotiation headers.
    #[must_use]
    pub const fn without_json_headers(mut self) -> Self {
        self.json_headers = false;
        self
    }
}

/// State for one conformance run: configuration, HTTP client, the token
/// cache and the report sink.
///
/// Operations take `&mut self` whenever they may touch the token, so one
/// session can never have two token refreshes in flight.
pub struct Session {
    config: HarnessConfig,
    http: Client,
    tokens: TokenCache,
    policy: AuthRetryPolicy,
    report: Arc<dyn ReportSink>,
    run_id: Uuid,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("run_id", &self.run_id)
            .field("base_url", &self.config.base_url.as_str())
            .field("token_cached", &self.tokens.is_cached())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session with a fresh HTTP client and an empty token cache.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] if the HTTP client cannot be built.
    pub fn new(config: HarnessConfig, report: Arc<dyn ReportSink>) -> HarnessResult<Self> {
        let http = build_http_client(&config.http)?;
        let tokens = TokenCache::new(Authenticator::new(http.clone(), &config));

        Ok(Self {
            config,
            http,
            tokens,
            policy: AuthRetryPolicy::new(),
            report,
            run_id: Uuid::new_v4(),
        })
    }

    /// Execute an operation.
    ///
    /// Operations that need a token get the cached one. If the API answers
    /// 403 the token is invalidated, regenerated, and the identical operation
    /// is sent once more; that second response is returned whatever its
    /// status. Any other status is returned from the first attempt.
    ///
    /// # Errors
    ///
    /// Transport failures and token generation failures are logged to the
    /// report as a fail entry, then returned. They are never retried.
    #[instrument(skip_all, fields(run_id = %self.run_id, method = %op.method, path = %op.path))]
    pub async fn execute(
        &mut self,
        op: &AuthenticatedOperation,
    ) -> HarnessResult<RetryOutcome<RawResponse>> {
        let result = self.execute_with_refresh(op).await;
        self.reported(result)
    }

    async fn execute_with_refresh(
        &mut self,
        op: &AuthenticatedOperation,
    ) -> HarnessResult<RetryOutcome<RawResponse>> {
        if !op.requires_auth {
            let response = self.send_once(op, None).await?;
            return Ok(RetryOutcome::Succeeded {
                response,
                attempts: 1,
            });
        }

        let mut token = self.tokens.get_token().await?;
        let mut attempt = 1;
        loop {
            let response = self.send_once(op, Some(&token)).await?;
            let status = response.status();

            if !self.policy.should_retry(status, attempt) {
                return Ok(self.policy.conclude(status, response, attempt));
            }

            warn!(attempt, "Request denied, refreshing token and retrying");
            self.tokens.invalidate_token();
            token = self.tokens.get_token().await?;
            attempt += 1;
        }
    }

    /// Send an operation once with an explicit token, bypassing the cache
    /// and the retry. Used to exercise the API's rejection of bad tokens.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure, after logging it
    /// to the report.
    pub async fn send_with_token(
        &self,
        op: &AuthenticatedOperation,
        token: &str,
    ) -> HarnessResult<RawResponse> {
        self.send(op, Some(token)).await
    }

    pub(crate) async fn send(
        &self,
        op: &AuthenticatedOperation,
        token: Option<&str>,
    ) -> HarnessResult<RawResponse> {
        let result = self.send_once(op, token).await;
        self.reported(result)
    }

    async fn send_once(
        &self,
        op: &AuthenticatedOperation,
        token: Option<&str>,
    ) -> HarnessResult<RawResponse> {
        let url = self.config.endpoint(&op.path);
        let mut request = self.http.request(op.method.clone(), &url);

        if op.json_headers {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ACCEPT, "application/json");
        }
        if let Some(token) = token {
            let cookie = header::HeaderValue::from_str(&format!("token={token}")).map_err(|e| {
                HarnessError::invalid_input(format!("token not valid in a cookie: {e}"))
            })?;
            request = request.header(header::COOKIE, cookie);
        }
        if let Some(body) = &op.body {
            request = request.json(body);
        }

        let response = RawResponse::read(request.send().await?).await?;
        debug!(status = response.status_code(), "Response received");
        Ok(response)
    }

    fn reported<T>(&self, result: HarnessResult<T>) -> HarnessResult<T> {
        if let Err(err) = &result {
            self.report.log_fail(&format!("FAIL: {err}"));
        }
        result
    }

    /// The token cache.
    #[must_use]
    pub const fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Mutable access to the token cache.
    pub const fn tokens_mut(&mut self) -> &mut TokenCache {
        &mut self.tokens
    }

    /// The report sink.
    #[must_use]
    pub fn report(&self) -> &dyn ReportSink {
        self.report.as_ref()
    }

    /// The run configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Identifier of this run, attached to every traced request.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Record which request a test is about to validate.
    pub fn log_request_details(&self, method: &Method, path: &str) {
        self.report
            .log_info(&format!("Method: {method}, Endpoint: {path}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booker_common::{ReportEntry, ReportLevel, TracingReport};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct Collecting(Mutex<Vec<ReportEntry>>);

    impl ReportSink for Collecting {
        fn record(&self, entry: ReportEntry) {
            self.0.lock().unwrap().push(entry);
        }
    }

    fn session_for(server: &MockServer) -> Session {
        session_reporting_to(server, Arc::new(TracingReport::new("executor-tests")))
    }

    fn session_reporting_to(server: &MockServer, report: Arc<dyn ReportSink>) -> Session {
        let config = HarnessConfig::new(
            &server.uri(),
            &format!("{}/auth", server.uri()),
            "admin",
            "password123",
        )
        .unwrap();
        Session::new(config, report).unwrap()
    }

    async fn mount_tokens(server: &MockServer, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
            .expect(calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_forbidden_then_ok_retries_once() {
        let server = MockServer::start().await;
        mount_tokens(&server, 2).await;
        Mock::given(method("DELETE"))
            .and(path("/booking/1"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/booking/1"))
            .and(header_is("cookie", "token=fresh"))
            .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
            .expect(1)
            .mount(&server)
            .await;
        let mut session = session_for(&server);

        let outcome = session
            .execute(&AuthenticatedOperation::delete("/booking/1"))
            .await
            .unwrap();

        assert!(!outcome.is_exhausted());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(outcome.response().status(), StatusCode::CREATED);
        assert_eq!(session.tokens().generated(), 2);
    }

    #[tokio::test]
    async fn test_forbidden_twice_returns_second_response() {
        let server = MockServer::start().await;
        mount_tokens(&server, 2).await;
        Mock::given(method("PUT"))
            .and(path("/booking/1"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .expect(2)
            .mount(&server)
            .await;
        let mut session = session_for(&server);

        let outcome = session
            .execute(&AuthenticatedOperation::put("/booking/1", Some(json!({}))))
            .await
            .unwrap();

        assert!(outcome.is_exhausted());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(outcome.into_response().body(), "Forbidden");
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        for status in [404_u16, 405, 500] {
            let server = MockServer::start().await;
            mount_tokens(&server, 1).await;
            Mock::given(method("DELETE"))
                .respond_with(ResponseTemplate::new(status))
                .expect(1)
                .mount(&server)
                .await;
            let mut session = session_for(&server);

            let outcome = session
                .execute(&AuthenticatedOperation::delete("/booking/abc"))
                .await
                .unwrap();

            assert_eq!(outcome.attempts(), 1);
            assert_eq!(outcome.response().status_code(), status);
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_op_skips_token() {
        let server = MockServer::start().await;
        mount_tokens(&server, 0).await;
        Mock::given(method("GET"))
            .and(path("/booking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        let mut session = session_for(&server);

        let outcome = session
            .execute(&AuthenticatedOperation::get("/booking"))
            .await
            .unwrap();

        assert_eq!(outcome.attempts(), 1);
        assert!(!session.tokens().is_cached());
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let server = MockServer::start().await;
        mount_tokens(&server, 1).await;
        let mut session = session_for(&server);
        session.tokens_mut().get_token().await.unwrap();

        let unreachable =
            HarnessConfig::new("http://127.0.0.1:9", &format!("{}/auth", server.uri()), "a", "b")
                .unwrap();
        session.config = unreachable;

        let err = session
            .execute(&AuthenticatedOperation::delete("/booking/1"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_token_failure_is_reported_before_returning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let report = Arc::new(Collecting::default());
        let mut session = session_reporting_to(&server, report.clone());

        let err = session
            .execute(&AuthenticatedOperation::put("/booking/2", None))
            .await
            .unwrap_err();

        let fails: Vec<String> = report
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.level == ReportLevel::Fail)
            .map(|entry| entry.message.clone())
            .collect();
        assert_eq!(fails, [format!("FAIL: {err}")]);
        assert_eq!(fails[0], "FAIL: Failed to generate token. Status code: 500");
    }
}
