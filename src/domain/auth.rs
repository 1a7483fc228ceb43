//! Authentication domain types
//!
//! A session is all-or-nothing: both tokens plus a non-expired instant, or
//! nothing. Partial token state is treated as not authenticated.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sign-in request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token refresh request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// 2FA enrollment material returned by the enable endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoFactorSetup {
    pub secret: String,
    pub otpauth_url: Option<String>,
}

/// Authenticated user info, as returned alongside tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Wire response for login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub user: Option<AuthUser>,
}

/// The persisted session: paired tokens plus the computed expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl Session {
    /// Builds a session from a wire response, computing the expiry instant
    /// from `expires_in` relative to now.
    pub fn from_response(resp: AuthResponse) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at: Utc::now() + Duration::seconds(resp.expires_in),
            user: resp.user,
        }
    }

    /// True once now is within `buffer_seconds` of the recorded expiry.
    /// The buffer makes the client refresh ahead of the actual instant.
    pub fn is_expired(&self, buffer_seconds: i64) -> bool {
        Utc::now() + Duration::seconds(buffer_seconds) >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at,
            user: None,
        }
    }

    #[test]
    fn past_expiry_is_expired() {
        let s = session(Utc::now() - Duration::minutes(1));
        assert!(s.is_expired(0));
    }

    #[test]
    fn buffer_expires_a_soon_to_lapse_session() {
        // 2 minutes left, 5 minute buffer: already considered expired.
        let s = session(Utc::now() + Duration::minutes(2));
        assert!(s.is_expired(300));
        assert!(!s.is_expired(0));
    }

    #[test]
    fn fresh_session_is_not_expired() {
        let s = session(Utc::now() + Duration::hours(1));
        assert!(!s.is_expired(300));
    }
}
