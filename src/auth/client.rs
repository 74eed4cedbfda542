//! Auth Service Client
//!
//! HTTP client for the external register/login service. Successful calls
//! store the returned session.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{
    validate_login, validate_registration, AuthResponse, LoginRequest, RegisterRequest,
    SessionStore,
};
use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::store::KeyValueStore;

#[derive(Debug, Deserialize)]
struct ServiceError {
    message: Option<String>,
}

/// Client for `POST {base}/auth/register` and `POST {base}/auth/login`.
#[derive(Debug, Clone)]
pub struct AuthClient<S> {
    http: reqwest::Client,
    base_url: String,
    sessions: SessionStore<S>,
}

impl<S: KeyValueStore> AuthClient<S> {
    /// Creates a client for the service at `base_url`, storing sessions in `store`.
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, store)
    }

    /// Creates a client for the configured auth service.
    pub fn from_config(config: &Config, store: S) -> Self {
        Self::new(config.auth_api_url.clone(), store)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, store: S) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sessions: SessionStore::new(store),
        }
    }

    pub fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    // == Register ==
    /// Validates the form, registers the user and stores the new session.
    pub async fn register(
        &self,
        request: &RegisterRequest,
        confirm_password: &str,
    ) -> Result<AuthResponse> {
        validate_registration(request, confirm_password)?;

        let response = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(request)
            .send()
            .await?;

        let auth = self.accept(response, "Registration failed").await?;
        info!(user = %auth.email, "registered");
        Ok(auth)
    }

    // == Login ==
    /// Validates the form, logs in and stores the session.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        validate_login(request)?;

        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(request)
            .send()
            .await?;

        let auth = self.accept(response, "Invalid email or password").await?;
        info!(user = %auth.email, "logged in");
        Ok(auth)
    }

    // == Logout ==
    /// Clears the stored session. Tokens are stateless; no call is made.
    pub fn logout(&self) {
        self.sessions.logout();
    }

    async fn accept(&self, response: reqwest::Response, fallback: &str) -> Result<AuthResponse> {
        let status = response.status();

        if status.is_success() {
            let auth: AuthResponse = response.json().await?;
            self.sessions.save(&auth)?;
            return Ok(auth);
        }

        if status == StatusCode::UNAUTHORIZED {
            // A rejected token or credentials invalidates whatever is stored
            self.sessions.logout();
        }

        let message = response
            .json::<ServiceError>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| fallback.to_string());
        warn!(status = %status, %message, "auth service rejected request");

        Err(LedgerError::Upstream(message))
    }
}
