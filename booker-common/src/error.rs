//! Error type for the request execution layer.
//!
//! Every variant is fatal to the caller. The only recoverable condition in the
//! harness, an expired token, is signalled by a 403 response status rather than
//! by an error, and is handled by [`crate::retry::AuthRetryPolicy`].

use thiserror::Error;

/// Errors raised while configuring the harness or executing requests.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Transport failure: connection refused, timeout, TLS, body read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration key is missing or holds an unusable value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The token endpoint answered with something other than 200
    #[error("Failed to generate token. Status code: {status}")]
    AuthFailed {
        /// Status code received from the token endpoint
        status: u16,
    },

    /// A 200 token response that carried no token
    #[error("Token missing from authentication response: {0}")]
    TokenMissing(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias for the execution layer.
pub type HarnessResult<T> = Result<T, HarnessError>;

impl HarnessError {
    /// Whether the error came from the HTTP transport rather than from the
    /// harness itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use booker_common::HarnessError;
    ///
    /// let err = HarnessError::AuthFailed { status: 418 };
    /// assert!(!err.is_transport());
    /// ```
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Create a configuration error with the given message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a configuration error for a key that was not supplied.
    #[must_use]
    pub fn missing_key(key: &str) -> Self {
        Self::Config(format!("missing required key '{key}'"))
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an authentication failure for the given status code.
    #[must_use]
    pub const fn auth_failed(status: u16) -> Self {
        Self::AuthFailed { status }
    }
}
