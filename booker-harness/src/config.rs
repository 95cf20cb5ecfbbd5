//! Harness configuration.

use booker_common::{HarnessError, HarnessResult, HttpConfig};
use secrecy::SecretString;
use url::Url;

/// Lookup key for the API root, e.g. `https://restful-booker.herokuapp.com`.
pub const KEY_BASE_URL: &str = "baseURL";
/// Lookup key for the full token endpoint URL.
pub const KEY_AUTH_URL: &str = "authURL";
/// Lookup key for the API username.
pub const KEY_USERNAME: &str = "username";
/// Lookup key for the API password.
pub const KEY_PASSWORD: &str = "password";

/// Environment variable backing each lookup key.
const ENV_KEYS: [(&str, &str); 4] = [
    (KEY_BASE_URL, "BOOKER_BASE_URL"),
    (KEY_AUTH_URL, "BOOKER_AUTH_URL"),
    (KEY_USERNAME, "BOOKER_USERNAME"),
    (KEY_PASSWORD, "BOOKER_PASSWORD"),
];

/// Configuration for one harness run.
///
/// Every key is required. A missing key is a startup failure, not something
/// the harness recovers from.
#[derive(Debug)]
pub struct HarnessConfig {
    /// API root that resource paths are appended to
    pub base_url: Url,
    /// Token endpoint
    pub auth_url: Url,
    /// API username
    pub username: String,
    /// API password
    pub password: SecretString,
    /// HTTP transport settings
    pub http: HttpConfig,
}

impl HarnessConfig {
    /// Create a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] if either URL does not parse.
    pub fn new(
        base_url: &str,
        auth_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> HarnessResult<Self> {
        Ok(Self {
            base_url: parse_url(KEY_BASE_URL, base_url)?,
            auth_url: parse_url(KEY_AUTH_URL, auth_url)?,
            username: username.into(),
            password: SecretString::from(password.into()),
            http: HttpConfig::default(),
        })
    }

    /// Build a configuration from a key/value source.
    ///
    /// `lookup` is asked for [`KEY_BASE_URL`], [`KEY_AUTH_URL`],
    /// [`KEY_USERNAME`] and [`KEY_PASSWORD`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] naming the first key that is missing
    /// or unusable.
    pub fn from_lookup<F>(lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| lookup(key).ok_or_else(|| HarnessError::missing_key(key));

        let base_url = require(KEY_BASE_URL)?;
        let auth_url = require(KEY_AUTH_URL)?;
        let username = require(KEY_USERNAME)?;
        let password = require(KEY_PASSWORD)?;

        Self::new(&base_url, &auth_url, username, password)
    }

    /// Build a configuration from `BOOKER_BASE_URL`, `BOOKER_AUTH_URL`,
    /// `BOOKER_USERNAME` and `BOOKER_PASSWORD`. The request timeout may be
    /// overridden through [`booker_common::http::TIMEOUT_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] if a variable is unset or unusable.
    pub fn from_env() -> HarnessResult<Self> {
        let config = Self::from_lookup(|key| {
            ENV_KEYS
                .iter()
                .find(|(name, _)| *name == key)
                .and_then(|(_, var)| std::env::var(var).ok())
        })?;
        let http = HttpConfig::default().with_overrides(|var| std::env::var(var).ok())?;
        Ok(config.with_http(http))
    }

    /// Replace the HTTP transport settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Absolute URL for a resource path such as `/booking/12`.
    ///
    /// The path is appended verbatim so that malformed ids (empty, non-numeric)
    /// reach the API exactly as a test wrote them.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

fn parse_url(key: &str, value: &str) -> HarnessResult<Url> {
    Url::parse(value).map_err(|e| HarnessError::config(format!("invalid URL for '{key}': {e}")))
}
