//! Buffered HTTP response.

use booker_common::HarnessResult;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Status and body of a response, read in full.
///
/// Validators need the body more than once (parsed and as raw text for
/// the report), so responses are buffered as soon as they arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: StatusCode,
    body: String,
}

impl RawResponse {
    /// Create a response from parts.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Read a live response to completion.
    ///
    /// # Errors
    ///
    /// Returns [`booker_common::HarnessError::Http`] if the body cannot be read.
    pub async fn read(response: reqwest::Response) -> HarnessResult<Self> {
        let status = response.status();
        let body = response.text().await?;
        Ok(Self { status, body })
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response status as a number.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Raw body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deserialize the body.
    ///
    /// # Errors
    ///
    /// Returns [`booker_common::HarnessError::Serialization`] if the body does
    /// not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> HarnessResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Value at a dotted path such as `booking.bookingdates.checkin`.
    ///
    /// Returns `Ok(None)` when the path is absent; an explicit JSON `null`
    /// is returned as `Some(Value::Null)`.
    ///
    /// # Errors
    ///
    /// Returns [`booker_common::HarnessError::Serialization`] if the body is
    /// not JSON.
    pub fn field(&self, path: &str) -> HarnessResult<Option<Value>> {
        let document: Value = serde_json::from_str(&self.body)?;
        let pointer = format!("/{}", path.replace('.', "/"));
        Ok(document.pointer(&pointer).cloned())
    }

    /// String value at a dotted path; `None` if absent, null or not a string.
    ///
    /// # Errors
    ///
    /// Returns [`booker_common::HarnessError::Serialization`] if the body is
    /// not JSON.
    pub fn string_field(&self, path: &str) -> HarnessResult<Option<String>> {
        Ok(self
            .field(path)?
            .and_then(|value| value.as_str().map(str::to_owned)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_field_lookup() {
        let response = RawResponse::new(
            StatusCode::OK,
            r#"{"booking":{"totalprice":null,"bookingdates":{"checkin":"0NaN-aN-aN"}}}"#,
        );

        assert_eq!(
            response.string_field("booking.bookingdates.checkin").unwrap(),
            Some("0NaN-aN-aN".to_string())
        );
        assert_eq!(response.field("booking.totalprice").unwrap(), Some(Value::Null));
        assert_eq!(response.field("booking.missing").unwrap(), None);
    }

    #[test]
    fn test_non_json_body() {
        let response = RawResponse::new(StatusCode::NOT_FOUND, "Not Found");
        assert_eq!(response.body(), "Not Found");
        assert_eq!(response.status_code(), 404);
        assert!(response.field("reason").is_err());
    }
}
