//! Auth service: login, refresh, logout.
//!
//! Owns the session store. Session state machine: logged out, then login
//! succeeds, then logged in; a successful refresh keeps the session, a
//! failed refresh or a logout returns to logged out. Callers never observe
//! an intermediate "refreshing" state.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::auth::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    RefreshTokenRequest, Session, TwoFactorSetup,
};
use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::storage::SessionStore;

pub struct AuthService {
    client: Client,
    base_url: String,
    correlation_id: String,
    store: Arc<dyn SessionStore>,
    expiry_buffer_seconds: i64,
    // Single-flight guard: overlapping refresh calls share one HTTP refresh.
    refresh_lock: Mutex<()>,
}

impl AuthService {
    pub fn new(
        base_url: &str,
        store: Arc<dyn SessionStore>,
        timeout_seconds: u64,
        expiry_buffer_seconds: i64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            correlation_id: Uuid::new_v4().to_string(),
            store,
            expiry_buffer_seconds,
            refresh_lock: Mutex::new(()),
        })
    }

    /// The session store this service writes to. Read-only for everyone else.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        self.store.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.store.load()
    }

    /// Bearer token for outgoing requests, if a session exists.
    pub fn access_token(&self) -> Option<String> {
        self.store.load().map(|s| s.access_token)
    }

    /// True iff both tokens are present and the access token has not passed
    /// the buffered expiry instant. Partial sessions read as unauthenticated.
    pub fn is_authenticated(&self) -> bool {
        match self.store.load() {
            Some(session) => {
                !session.access_token.is_empty()
                    && !session.refresh_token.is_empty()
                    && !session.is_expired(self.expiry_buffer_seconds)
            }
            None => false,
        }
    }

    /// True when no expiry is recorded or the buffered expiry has passed.
    pub fn is_token_expired(&self) -> bool {
        match self.store.load() {
            Some(session) => session.is_expired(self.expiry_buffer_seconds),
            None => true,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Correlation-ID", &self.correlation_id)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            return Err(ClientError::from_status(status.as_u16(), detail, "Login failed"));
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("auth response: {}", e)))?;

        let session = Session::from_response(auth);
        self.store.save(&session)?;
        info!(email = email, "Login succeeded");
        Ok(session)
    }

    /// Refreshes the access token. Fails fast when no refresh token is
    /// stored; an HTTP failure invalidates the whole session (forced logout)
    /// before the error propagates.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> ClientResult<Session> {
        let _guard = self.refresh_lock.lock().await;

        // A concurrent caller may have refreshed while we waited on the lock.
        if let Some(session) = self.store.load() {
            if !session.is_expired(self.expiry_buffer_seconds) {
                debug!("Session already fresh, skipping refresh");
                return Ok(session);
            }
        }

        let refresh_token = self
            .store
            .load()
            .map(|s| s.refresh_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::unauthorized("No refresh token available"))?;

        let url = format!("{}/auth/refresh", self.base_url);
        let result = async {
            let response = self
                .client
                .post(&url)
                .header("X-Correlation-ID", &self.correlation_id)
                .json(&RefreshTokenRequest { refresh_token })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
                return Err(ClientError::from_status(
                    status.as_u16(),
                    detail,
                    "Token refresh failed",
                ));
            }

            response
                .json::<AuthResponse>()
                .await
                .map_err(|e| ClientError::InvalidResponse(format!("refresh response: {}", e)))
        }
        .await;

        match result {
            Ok(auth) => {
                let session = Session::from_response(auth);
                self.store.save(&session)?;
                debug!("Access token refreshed");
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, invalidating session");
                // A stale or partial session must not linger.
                self.store.clear()?;
                Err(e)
            }
        }
    }

    /// Best-effort server-side invalidation. Local state is cleared first so
    /// logout can never fail to log the caller out.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> ClientResult<()> {
        let token = self.access_token();
        self.store.clear()?;

        if let Some(token) = token {
            let url = format!("{}/auth/logout", self.base_url);
            let outcome = self
                .client
                .post(&url)
                .header("X-Correlation-ID", &self.correlation_id)
                .bearer_auth(token)
                .send()
                .await;
            if let Err(e) = outcome {
                debug!(error = %e, "Server-side logout failed, local session already cleared");
            }
        }

        info!("Logged out");
        Ok(())
    }

    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<()> {
        let token = self
            .access_token()
            .ok_or_else(|| ClientError::unauthorized("Not authenticated"))?;

        let url = format!("{}/auth/change-password", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Correlation-ID", &self.correlation_id)
            .bearer_auth(token)
            .json(&ChangePasswordRequest {
                current_password: current.to_string(),
                new_password: new.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            return Err(ClientError::from_status(
                status.as_u16(),
                detail,
                "Failed to change password",
            ));
        }
        Ok(())
    }

    /// Starts 2FA enrollment; returns the provisioning secret to present
    /// to the user.
    pub async fn enable_two_factor(&self) -> ClientResult<TwoFactorSetup> {
        let token = self
            .access_token()
            .ok_or_else(|| ClientError::unauthorized("Not authenticated"))?;

        let url = format!("{}/auth/2fa/enable", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Correlation-ID", &self.correlation_id)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            return Err(ClientError::from_status(
                status.as_u16(),
                detail,
                "Failed to enable two-factor authentication",
            ));
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("2fa setup response: {}", e)))
    }

    pub async fn verify_two_factor(&self, code: &str) -> ClientResult<()> {
        let token = self
            .access_token()
            .ok_or_else(|| ClientError::unauthorized("Not authenticated"))?;

        let url = format!("{}/auth/2fa/verify", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Correlation-ID", &self.correlation_id)
            .bearer_auth(token)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            return Err(ClientError::from_status(
                status.as_u16(),
                detail,
                "Invalid verification code",
            ));
        }
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let url = format!("{}/auth/forgot-password", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Correlation-ID", &self.correlation_id)
            .json(&ForgotPasswordRequest {
                email: email.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            return Err(ClientError::from_status(
                status.as_u16(),
                detail,
                "Failed to request password reset",
            ));
        }
        Ok(())
    }
}
