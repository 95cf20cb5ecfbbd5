//! Token acquisition and caching.

use crate::{config::HarnessConfig, response::RawResponse};
use booker_common::{HarnessError, HarnessResult};
use reqwest::{Client, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Outcome of one authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    /// The endpoint answered 200 with a token
    Success(String),
    /// The endpoint answered with another status
    Failure(StatusCode),
}

impl AuthResult {
    /// Interpret a token endpoint response.
    ///
    /// # Errors
    ///
    /// A 200 whose body has no `token` string (the public API answers wrong
    /// credentials this way) yields [`HarnessError::TokenMissing`].
    pub fn from_response(response: &RawResponse) -> HarnessResult<Self> {
        if response.status() != StatusCode::OK {
            return Ok(Self::Failure(response.status()));
        }
        match response.string_field("token")? {
            Some(token) if !token.is_empty() => Ok(Self::Success(token)),
            _ => Err(HarnessError::TokenMissing(response.body().to_string())),
        }
    }

    /// The token, or the fatal error carrying the received status.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::AuthFailed`] for [`AuthResult::Failure`].
    pub fn into_token(self) -> HarnessResult<String> {
        match self {
            Self::Success(token) => Ok(token),
            Self::Failure(status) => Err(HarnessError::auth_failed(status.as_u16())),
        }
    }
}

/// Sends authentication requests to the token endpoint.
#[derive(Debug)]
pub struct Authenticator {
    http: Client,
    auth_url: Url,
    username: String,
    password: SecretString,
}

impl Authenticator {
    /// Create an authenticator for the configured endpoint and credentials.
    #[must_use]
    pub fn new(http: Client, config: &HarnessConfig) -> Self {
        Self {
            http,
            auth_url: config.auth_url.clone(),
            username: config.username.clone(),
            password: SecretString::from(config.password.expose_secret().to_owned()),
        }
    }

    /// Request a token for arbitrary credentials and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    #[instrument(skip(self, password), fields(url = %self.auth_url))]
    pub async fn generate_token_response(
        &self,
        username: &str,
        password: &str,
    ) -> HarnessResult<RawResponse> {
        let body = json!({ "username": username, "password": password });

        let response = self
            .http
            .post(self.auth_url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let response = RawResponse::read(response).await?;
        debug!(status = response.status_code(), "Token endpoint answered");
        Ok(response)
    }

    /// Authenticate with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure and
    /// [`HarnessError::TokenMissing`] for a 200 without a token.
    pub async fn authenticate(&self) -> HarnessResult<AuthResult> {
        let response = self
            .generate_token_response(&self.username, self.password.expose_secret())
            .await?;
        AuthResult::from_response(&response)
    }
}

/// Holds at most one token for a session.
///
/// A token is fetched on first use and kept until [`TokenCache::invalidate_token`]
/// is called. There is no expiry timer: the server's 403 is the only signal
/// that a token went stale.
#[derive(Debug)]
pub struct TokenCache {
    authenticator: Authenticator,
    token: Option<String>,
    generated: u32,
}

impl TokenCache {
    /// Create an empty cache.
    #[must_use]
    pub const fn new(authenticator: Authenticator) -> Self {
        Self {
            authenticator,
            token: None,
            generated: 0,
        }
    }

    /// Return the cached token, authenticating first if none is cached.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::AuthFailed`] with the received status if the
    /// token endpoint answers anything but 200. This is not retried.
    pub async fn get_token(&mut self) -> HarnessResult<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let token = match self.authenticator.authenticate().await?.into_token() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Token generation failed");
                return Err(err);
            }
        };
        self.generated += 1;
        info!(generation = self.generated, "Generated authentication token");

        self.token = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token. The next [`TokenCache::get_token`] authenticates again.
    pub fn invalidate_token(&mut self) {
        if self.token.take().is_some() {
            debug!("Invalidated cached token");
        }
    }

    /// Request a token for arbitrary credentials without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn generate_token_response(
        &self,
        username: &str,
        password: &str,
    ) -> HarnessResult<RawResponse> {
        self.authenticator
            .generate_token_response(username, password)
            .await
    }

    /// Whether a token is currently cached.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.token.is_some()
    }

    /// Number of tokens generated through this cache.
    #[must_use]
    pub const fn generated(&self) -> u32 {
        self.generated
    }
}
