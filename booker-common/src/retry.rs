//! Authorization retry policy.
//!
//! A state-changing call that is answered with 403 is assumed to have been
//! sent with an expired token. The caller refreshes its token and sends the
//! identical request once more. The second response is final, whatever it is.
//! No other status and no transport error is ever retried.

use reqwest::StatusCode;

/// Attempts allowed per operation: the first send plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Typed result of running an operation under [`AuthRetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<R> {
    /// The last attempt was not denied.
    Succeeded {
        /// Response of the last attempt
        response: R,
        /// Attempts made, 1 or 2
        attempts: u32,
    },
    /// Every allowed attempt was denied; holds the last denied response.
    ExhaustedRetries {
        /// Response of the final attempt
        response: R,
        /// Attempts made
        attempts: u32,
    },
}

impl<R> RetryOutcome<R> {
    /// Borrow the final response.
    #[must_use]
    pub const fn response(&self) -> &R {
        match self {
            Self::Succeeded { response, .. } | Self::ExhaustedRetries { response, .. } => response,
        }
    }

    /// Take the final response.
    #[must_use]
    pub fn into_response(self) -> R {
        match self {
            Self::Succeeded { response, .. } | Self::ExhaustedRetries { response, .. } => response,
        }
    }

    /// Number of attempts that were sent.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. } | Self::ExhaustedRetries { attempts, .. } => *attempts,
        }
    }

    /// Whether the operation was resent after a denial.
    #[must_use]
    pub const fn was_retried(&self) -> bool {
        self.attempts() > 1
    }

    /// Whether every attempt was denied.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::ExhaustedRetries { .. })
    }
}

/// Decides whether a response warrants a token refresh and a resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRetryPolicy {
    denied_status: StatusCode,
    max_attempts: u32,
}

impl AuthRetryPolicy {
    /// Policy retrying once on 403 Forbidden.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            denied_status: StatusCode::FORBIDDEN,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Whether `status` signals a rejected token.
    #[must_use]
    pub fn is_denied(&self, status: StatusCode) -> bool {
        status == self.denied_status
    }

    /// Whether attempt number `attempt` (1-based) answered with `status`
    /// should be followed by a refresh and another attempt.
    #[must_use]
    pub fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        self.is_denied(status) && attempt < self.max_attempts
    }

    /// Classify the response of attempt number `attempt` once no further
    /// attempt will be made.
    #[must_use]
    pub fn conclude<R>(&self, status: StatusCode, response: R, attempts: u32) -> RetryOutcome<R> {
        if self.is_denied(status) {
            RetryOutcome::ExhaustedRetries { response, attempts }
        } else {
            RetryOutcome::Succeeded { response, attempts }
        }
    }

    /// Maximum attempts per operation.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for AuthRetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
