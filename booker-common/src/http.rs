//! HTTP transport settings.
//!
//! Transport failures are never retried, so the timeouts configured here are
//! the only bound on how long a single hung request can stall a run.

use crate::error::{HarnessError, HarnessResult};
use reqwest::{Client, ClientBuilder, redirect::Policy};
use std::time::Duration;

/// Variable that overrides [`HttpConfig::request_timeout`], in whole seconds.
pub const TIMEOUT_ENV: &str = "BOOKER_HTTP_TIMEOUT_SECS";

const MAX_REDIRECTS: usize = 5;

/// Settings for the client shared by the token cache and the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout (default: 30s)
    pub request_timeout: Duration,
    /// TCP connect timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Idle connections kept per host (default: 2)
    pub max_idle_per_host: usize,
    /// Whether 3xx answers are followed. Off by default so every status
    /// reaches the validators as the API sent it.
    pub follow_redirects: bool,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_idle_per_host: 2,
            follow_redirects: false,
            user_agent: concat!("booker-conformance/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Set the whole-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Follow up to five redirects.
    #[must_use]
    pub const fn following_redirects(mut self) -> Self {
        self.follow_redirects = true;
        self
    }

    /// Apply [`TIMEOUT_ENV`] from `lookup`, if set.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] if the value is not a positive
    /// number of seconds.
    pub fn with_overrides<F>(self, lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(TIMEOUT_ENV) else {
            return Ok(self);
        };
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(self.with_request_timeout(Duration::from_secs(secs))),
            _ => Err(HarnessError::config(format!(
                "invalid value for '{TIMEOUT_ENV}': expected whole seconds, got '{raw}'"
            ))),
        }
    }
}

/// Build the HTTP client for a session.
///
/// The client keeps no cookie store: the token cookie is attached per
/// request by the executor.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS initialization fails).
///
/// # Examples
///
/// ```
/// use booker_common::{HttpConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = HttpConfig::default().with_request_timeout(Duration::from_secs(5));
/// assert!(build_http_client(&config).is_ok());
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let redirects = if config.follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    ClientBuilder::new()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(config.max_idle_per_host)
        .redirect(redirects)
        .user_agent(&config.user_agent)
        .use_rustls_tls()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_do_not_follow_redirects() {
        let config = HttpConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.follow_redirects);
        assert!(config.user_agent.starts_with("booker-conformance/"));
        assert!(config.following_redirects().follow_redirects);
    }

    #[test]
    fn test_timeout_override() {
        let config = HttpConfig::default()
            .with_overrides(|key| (key == TIMEOUT_ENV).then(|| " 5 ".to_string()))
            .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let unchanged = HttpConfig::default().with_overrides(|_| None).unwrap();
        assert_eq!(unchanged, HttpConfig::default());
    }

    #[test]
    fn test_bad_timeout_override_names_variable() {
        for raw in ["0", "soon", "-3"] {
            let err = HttpConfig::default()
                .with_overrides(|_| Some(raw.to_string()))
                .unwrap_err();
            assert!(err.to_string().contains(TIMEOUT_ENV), "{raw}: {err}");
        }
    }

    #[test]
    fn test_build_client() {
        let config = HttpConfig::default()
            .with_connect_timeout(Duration::from_secs(2))
            .with_user_agent("booker-tests");
        assert!(build_http_client(&config).is_ok());
    }
}
