//! Booking API operations.
//!
//! Ids are taken as strings so suites can send empty or non-numeric ids.

use crate::{
    booking::Booking,
    executor::{AuthenticatedOperation, Session},
    payloads::booking_payload,
    response::RawResponse,
};
use booker_common::{HarnessResult, RetryOutcome};
use serde_json::Value;

/// Collection path.
pub const BOOKING_PATH: &str = "/booking";

/// Path of a single booking.
#[must_use]
pub fn booking_path(id: &str) -> String {
    format!("{BOOKING_PATH}/{id}")
}

impl Session {
    /// `POST /booking` with a typed booking.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn create_booking(&self, booking: &Booking) -> HarnessResult<RawResponse> {
        self.create_booking_payload(booking_payload(booking)).await
    }

    /// `POST /booking` with an arbitrary body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn create_booking_payload(&self, payload: Value) -> HarnessResult<RawResponse> {
        self.send(&AuthenticatedOperation::post(BOOKING_PATH, payload), None)
            .await
    }

    /// `GET /booking/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn get_booking(&self, id: &str) -> HarnessResult<RawResponse> {
        self.send(&AuthenticatedOperation::get(booking_path(id)), None)
            .await
    }

    /// `GET /booking`, optionally without JSON content negotiation headers.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn list_booking_ids(&self, json_headers: bool) -> HarnessResult<RawResponse> {
        let mut op = AuthenticatedOperation::get(BOOKING_PATH);
        if !json_headers {
            op = op.without_json_headers();
        }
        self.send(&op, None).await
    }

    /// `PUT /booking/{id}` with the cached token, retrying once on 403.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or token generation failure.
    pub async fn update_booking(
        &mut self,
        id: &str,
        payload: Value,
    ) -> HarnessResult<RetryOutcome<RawResponse>> {
        self.execute(&AuthenticatedOperation::put(booking_path(id), Some(payload)))
            .await
    }

    /// `DELETE /booking/{id}` with the cached token, retrying once on 403.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or token generation failure.
    pub async fn delete_booking(&mut self, id: &str) -> HarnessResult<RetryOutcome<RawResponse>> {
        self.execute(&AuthenticatedOperation::delete(booking_path(id)))
            .await
    }

    /// `PUT /booking/{id}` once with the given token and no body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn update_booking_with_token(
        &self,
        id: &str,
        token: &str,
    ) -> HarnessResult<RawResponse> {
        self.send_with_token(&AuthenticatedOperation::put(booking_path(id), None), token)
            .await
    }

    /// `DELETE /booking/{id}` once with the given token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn delete_booking_with_token(
        &self,
        id: &str,
        token: &str,
    ) -> HarnessResult<RawResponse> {
        self.send_with_token(&AuthenticatedOperation::delete(booking_path(id)), token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use booker_common::TracingReport;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(server: &MockServer) -> Session {
        let config = HarnessConfig::new(
            &server.uri(),
            &format!("{}/auth", server.uri()),
            "admin",
            "password123",
        )
        .unwrap();
        Session::new(config, Arc::new(TracingReport::new("api-tests"))).unwrap()
    }

    #[test]
    fn test_booking_path() {
        assert_eq!(booking_path("12"), "/booking/12");
        assert_eq!(booking_path(""), "/booking/");
    }

    #[tokio::test]
    async fn test_create_sends_booking_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/booking"))
            .and(body_json(serde_json::to_value(Booking::sample()).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bookingid": 5,
                "booking": Booking::sample(),
            })))
            .expect(1)
            .mount(&server)
            .await;
        let session = session_for(&server);

        let response = session.create_booking(&Booking::sample()).await.unwrap();
        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_explicit_token_is_sent_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/booking/1"))
            .and(header("cookie", "token="))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .expect(1)
            .mount(&server)
            .await;
        let session = session_for(&server);

        let response = session.delete_booking_with_token("1", "").await.unwrap();
        assert_eq!(response.status_code(), 403);
        assert!(!session.tokens().is_cached());
    }
}
